//! End-to-end games driven through the public plugin API.

use avalon_game_engine::engine::models::{GameConfig, SeatIndex};
use avalon_game_engine::engine::plugin::GamePlugin;
use avalon_game_engine::engine::simulator::play_game;
use avalon_game_engine::games::avalon::agents::{AgentParams, TableStrategy};
use avalon_game_engine::games::avalon::types::{Alignment, MissionOutcome, NUM_PLAYERS};
use avalon_game_engine::games::avalon::{AvalonAction, AvalonPlugin, GameState, Phase, Role, SeatMask};

fn seeded_game(seed: u64) -> GameState {
    AvalonPlugin.reset(&GameConfig::seeded(seed)).0
}

/// Leader proposes the first `mission_size` seats and everyone approves.
fn approve_first_seats(state: &mut GameState) {
    let size = state.mission_size().unwrap();
    let team: Vec<SeatIndex> = (0..size).collect();
    AvalonPlugin
        .step(state, &AvalonAction::Propose(SeatMask::from_seats(&team)))
        .unwrap();
    AvalonPlugin.step(state, &AvalonAction::Vote(SeatMask::ALL)).unwrap();
    assert_eq!(state.phase, Phase::Mission);
}

fn assert_rewards_by_alignment(state: &GameState, winner: Alignment) {
    assert_eq!(state.rewards.len(), NUM_PLAYERS);
    for seat in 0..NUM_PLAYERS {
        let alignment = state.assignment.alignment_of(seat).unwrap();
        let expected = if alignment == winner { 1 } else { -1 };
        assert_eq!(state.rewards[&seat], expected, "seat {seat}");
    }
}

fn three_clean_missions(seed: u64) -> GameState {
    let mut state = seeded_game(seed);
    for round in 0..3 {
        approve_first_seats(&mut state);
        AvalonPlugin
            .step(&mut state, &AvalonAction::Mission(SeatMask::EMPTY))
            .unwrap();
        assert_eq!(state.successful_missions as usize, round + 1);
    }
    state
}

#[test]
fn test_clean_missions_reach_assassination() {
    for seed in 0..10 {
        let state = three_clean_missions(seed);
        assert_eq!(state.successful_missions, 3);
        assert_eq!(state.failed_missions, 0);
        assert_eq!(state.phase, Phase::Assassination);
        assert!(state.rewards.is_empty());
        assert_eq!(state.mission_history[..3], [Some(MissionOutcome::Success); 3]);
    }
}

#[test]
fn test_assassin_kills_merlin() {
    for seed in 0..10 {
        let mut state = three_clean_missions(seed);
        let merlin = state.assignment.seat_of(Role::Merlin).unwrap();
        let step = AvalonPlugin
            .step(&mut state, &AvalonAction::Assassinate(SeatMask::from_seats(&[merlin])))
            .unwrap();

        assert_eq!(step.observation.phase, Phase::GameOver);
        assert!(state.assassin_kill);
        assert_rewards_by_alignment(&state, Alignment::Evil);
        assert_eq!(step.rewards, state.rewards);
    }
}

#[test]
fn test_assassin_misses_merlin() {
    let mut state = three_clean_missions(5);
    let merlin = state.assignment.seat_of(Role::Merlin).unwrap();
    let wrong = (merlin + 1) % NUM_PLAYERS;
    AvalonPlugin
        .step(&mut state, &AvalonAction::Assassinate(SeatMask::from_seats(&[wrong])))
        .unwrap();

    assert_eq!(state.phase, Phase::GameOver);
    assert!(!state.assassin_kill);
    assert_rewards_by_alignment(&state, Alignment::Good);
}

#[test]
fn test_three_failed_missions_skip_assassination() {
    for seed in 0..10 {
        let mut state = seeded_game(seed);
        for round in 0..3 {
            assert_ne!(state.phase, Phase::Assassination);
            approve_first_seats(&mut state);
            AvalonPlugin
                .step(&mut state, &AvalonAction::Mission(SeatMask::from_seats(&[0])))
                .unwrap();
            assert_eq!(state.failed_missions as usize, round + 1);
        }
        assert_eq!(state.phase, Phase::GameOver);
        assert_eq!(state.successful_missions, 0);
        assert_rewards_by_alignment(&state, Alignment::Evil);

        let result = AvalonPlugin.game_result(&state).unwrap();
        assert_eq!(result.winning_team, "evil");
        assert_eq!(result.reason, "missions_failed");
    }
}

#[test]
fn test_game_over_then_done() {
    let mut state = three_clean_missions(1);
    let step = AvalonPlugin
        .step(&mut state, &AvalonAction::Assassinate(SeatMask::from_seats(&[0])))
        .unwrap();
    assert!(!step.done);
    assert!(AvalonPlugin.is_terminal(&state));

    let step = AvalonPlugin.step(&mut state, &AvalonAction::Acknowledge).unwrap();
    assert!(step.done);
    assert!(!step.truncated);
}

#[test]
fn test_random_games_terminate_with_alignment_rewards() {
    let plugin = AvalonPlugin;
    let strategy = TableStrategy::random(AgentParams::default());
    for seed in 0..50 {
        let record = play_game(&plugin, &strategy, &GameConfig::seeded(seed), 10_000, None).unwrap();
        assert!(!record.truncated, "seed {seed}");

        let state = &record.final_state;
        assert_eq!(state.phase, Phase::GameOver);
        assert!(state.current_round < 5);
        assert!(state.successful_missions == 3 || state.failed_missions == 3);
        assert_rewards_by_alignment(state, state.winner().unwrap());
    }
}

#[test]
fn test_secret_knowledge_matches_seating() {
    let state = seeded_game(123);
    let known = AvalonPlugin.secret_knowledge(&state, Role::Percival).unwrap();
    assert_eq!(known.len(), 1);
    let merlin = state.assignment.seat_of(Role::Merlin).unwrap();
    assert_eq!(known.get(merlin), Some(Role::Merlin));

    let servant_view = AvalonPlugin.secret_knowledge(&state, Role::LoyalServant).unwrap();
    assert!(servant_view.is_empty());
}
