use rainworms::bots::{Bot, GreedyBot, RandomBot};
use rainworms::driver::GameDriver;
use rainworms::rainworms::{
    BustPenalty, DiceRoller, Face, GameSettings, GameState, Hand, Phase, RwAction, Stone,
};
use rainworms::search::{Actor, State};
use rainworms::RainwormsError;
use test_env_log::test;

fn roll(state: &mut GameState, counts: [u8; 6]) {
    state.apply(RwAction::Roll).unwrap();
    state
        .apply(RwAction::Dice(Hand::from_counts(counts)))
        .unwrap();
}

/// Keeps eight fives and worms, then rolls only faces that are already kept
fn bust(state: &mut GameState) {
    roll(state, [0, 0, 0, 0, 4, 4]);
    state.apply(RwAction::Keep(Face::Worm)).unwrap();
    roll(state, [0, 0, 0, 0, 0, 4]);
    assert_eq!(state.legal_actions(), vec![RwAction::Bust]);
    state.apply(RwAction::Bust).unwrap();
}

#[test]
fn test_bust_flips_the_top_stone() {
    let mut state = GameState::new(&GameSettings::with_players(2)).unwrap();
    state.deal_stone(0, 22).unwrap();
    bust(&mut state);
    assert!(state.turn().bust);
    assert_eq!(state.bank().flipped(), &[Stone::new(36, 4)]);
    assert_eq!(state.bank().available().len(), 14);
    assert_eq!(state.player(0).unwrap().top_stone(), Some(Stone::new(22, 1)));
    assert_eq!(state.stones_accounted_for(), 16);
}

#[test]
fn test_classic_bust_returns_and_flips() {
    let settings = GameSettings {
        player_count: 2,
        bust_penalty: BustPenalty::ReturnAndFlip,
        ..GameSettings::default()
    };
    let mut state = GameState::new(&settings).unwrap();
    state.deal_stone(0, 22).unwrap();
    bust(&mut state);
    assert_eq!(state.player(0).unwrap().top_stone(), None);
    assert!(state.bank().contains(22));
    assert_eq!(state.bank().flipped(), &[Stone::new(36, 4)]);
    assert_eq!(state.stones_accounted_for(), 16);
}

#[test]
fn test_classic_bust_returning_the_highest_stone_flips_nothing() {
    let settings = GameSettings {
        player_count: 2,
        bust_penalty: BustPenalty::ReturnAndFlip,
        ..GameSettings::default()
    };
    let mut state = GameState::new(&settings).unwrap();
    state.deal_stone(0, 36).unwrap();
    bust(&mut state);
    assert!(state.bank().flipped().is_empty());
    assert_eq!(state.bank().peek_top(), Some(Stone::new(36, 4)));
}

#[test]
fn test_classic_bust_without_stones_costs_nothing() {
    let settings = GameSettings {
        player_count: 2,
        bust_penalty: BustPenalty::ReturnAndFlip,
        ..GameSettings::default()
    };
    let mut state = GameState::new(&settings).unwrap();
    bust(&mut state);
    assert_eq!(state.bank().available().len(), 16);
    assert!(state.bank().flipped().is_empty());
}

#[test]
fn test_bust_is_never_offered_beside_other_actions() {
    let mut state = GameState::new(&GameSettings::with_players(3)).unwrap();
    roll(&mut state, [2, 1, 1, 1, 1, 2]);
    let keeps = state.legal_actions();
    assert_eq!(keeps.len(), 6);
    assert!(!keeps.contains(&RwAction::Bust));
    state.apply(RwAction::Keep(Face::One)).unwrap();
    assert_eq!(state.legal_actions(), vec![RwAction::Roll]);
}

#[test]
fn test_take_and_steal_both_listed() {
    let settings = GameSettings {
        player_count: 2,
        stones: vec![Stone::new(25, 2), Stone::new(25, 2), Stone::new(30, 3)],
        ..GameSettings::default()
    };
    let mut state = GameState::new(&settings).unwrap();
    state.deal_stone(1, 25).unwrap();
    roll(&mut state, [0, 0, 0, 0, 3, 5]);
    state.apply(RwAction::Keep(Face::Worm)).unwrap();
    assert_eq!(
        state.legal_actions(),
        vec![RwAction::Roll, RwAction::Take(25), RwAction::Steal(25)]
    );
}

#[test]
fn test_steal_takes_from_the_first_seat_showing_the_number() {
    let settings = GameSettings {
        player_count: 3,
        dice: 3,
        stones: vec![Stone::new(10, 1), Stone::new(10, 2), Stone::new(12, 3)],
        ..GameSettings::default()
    };
    let mut state = GameState::new(&settings).unwrap();
    state.deal_stone(2, 10).unwrap();
    state.deal_stone(1, 10).unwrap();
    let seat_one = state.player(1).unwrap().top_stone();
    let seat_two = state.player(2).unwrap().top_stone();
    assert_eq!(state.steal_target(10), Some(1));

    roll(&mut state, [0, 0, 0, 0, 1, 2]);
    state.apply(RwAction::Keep(Face::Worm)).unwrap();
    assert_eq!(
        state.legal_actions(),
        vec![RwAction::Roll, RwAction::Steal(10)]
    );
    state.apply(RwAction::Steal(10)).unwrap();
    assert_eq!(state.player(0).unwrap().top_stone(), seat_one);
    assert_eq!(state.player(1).unwrap().top_stone(), None);
    assert_eq!(state.player(2).unwrap().top_stone(), seat_two);
    assert_eq!(state.stones_accounted_for(), 3);
}

#[test]
fn test_illegal_and_terminal_actions_are_refused() {
    let mut state = GameState::new(&GameSettings {
        player_count: 2,
        stones: vec![Stone::new(21, 1)],
        ..GameSettings::default()
    })
    .unwrap();
    assert_eq!(
        state.apply(RwAction::Keep(Face::Worm)),
        Err(RainwormsError::IllegalAction {
            action: RwAction::Keep(Face::Worm)
        })
    );
    roll(&mut state, [0, 0, 0, 0, 3, 5]);
    state.apply(RwAction::Keep(Face::Worm)).unwrap();
    assert_eq!(
        state.apply(RwAction::Steal(25)),
        Err(RainwormsError::IllegalAction {
            action: RwAction::Steal(25)
        })
    );
    state.apply(RwAction::Take(21)).unwrap();
    assert!(state.is_game_over());
    assert_eq!(
        state.apply(RwAction::Roll),
        Err(RainwormsError::TerminalStateViolation)
    );
}

#[test]
fn test_rolling_is_a_chance_node() {
    let mut state = GameState::new(&GameSettings {
        player_count: 2,
        dice: 3,
        ..GameSettings::default()
    })
    .unwrap();
    state.apply(RwAction::Roll).unwrap();
    assert_eq!(state.turn().phase, Phase::AwaitingRoll);
    match state.next_actor() {
        Actor::GameAction(outcomes) => {
            assert_eq!(outcomes.len(), 56);
            let weight: u32 = outcomes.iter().map(|(_, weight)| weight).sum();
            assert_eq!(weight, 216);
        }
        Actor::Player(_) => panic!("the dice should be rolling"),
    }
}

#[test]
fn test_stones_are_conserved_through_full_games() {
    for seed in 0..10 {
        let bots: Vec<Box<dyn Bot>> = vec![
            Box::new(GreedyBot::new(3)),
            Box::new(GreedyBot::stealing(2)),
            Box::new(RandomBot::new(seed)),
        ];
        let mut driver = GameDriver::new(
            &GameSettings::with_players(3),
            bots,
            DiceRoller::from_seed(seed),
        )
        .unwrap();
        while !driver.state().is_game_over() {
            driver.play_turn().unwrap();
            assert_eq!(
                driver.state().stones_accounted_for(),
                driver.state().initial_stone_count()
            );
        }
        assert!(driver.state().terminal());
        assert!(driver.state().bank().available().is_empty());
    }
}

#[test]
fn test_seeded_games_repeat() {
    let play = |seed: u64| {
        let bots: Vec<Box<dyn Bot>> = vec![
            Box::new(GreedyBot::new(3)),
            Box::new(RandomBot::new(seed)),
        ];
        GameDriver::new(
            &GameSettings::with_players(2),
            bots,
            DiceRoller::from_seed(seed),
        )
        .unwrap()
        .run()
        .unwrap()
    };
    assert_eq!(play(5), play(5));
}
