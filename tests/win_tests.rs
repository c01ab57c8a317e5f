//! Win-condition integration tests.
//!
//! Covers built-in conditions, effect-attached conditions, timing, and
//! fault isolation when a condition errors.

use grimoire::core::{
    Alignment, EffectId, EffectInstance, EngineConfig, Game, HistoryKind, Phase, Player, PlayerId,
};
use grimoire::effects::{EffectDefinition, EffectRegistry};
use grimoire::error::{RuleError, RuleResult};
use grimoire::games::sample::{self, roles};
use grimoire::pipeline::{Cause, Intent};
use grimoire::roles::RoleRegistry;
use grimoire::rules::{
    check_end_of_day_win_conditions, check_win_condition, Ruleset, WinCondition, WinContext,
    WinTiming,
};
use grimoire::turn::{end_day, reveal_roles, setup_game, start_day, submit_intent, ActionFlow};

fn p(id: u32) -> PlayerId {
    PlayerId::new(id)
}

fn sample_game(ruleset: &Ruleset, seats: &[grimoire::core::RoleId]) -> Game {
    let game = setup_game(
        seats
            .iter()
            .enumerate()
            .map(|(i, role)| Player::new(p(i as u32), format!("P{}", i), role.clone())),
        ruleset,
    )
    .unwrap();
    reveal_roles(&game).unwrap()
}

fn committed(flow: ActionFlow) -> (Game, Option<Alignment>) {
    match flow {
        ActionFlow::Committed { game, winner } => (game, winner),
        ActionFlow::AwaitingInput { .. } => panic!("expected committed flow"),
    }
}

/// Demon, martyr, and four villagers: large enough to stay clear of parity.
fn martyr_table() -> Vec<grimoire::core::RoleId> {
    vec![
        roles::DEMON,
        roles::MARTYR,
        roles::VILLAGER,
        roles::VILLAGER,
        roles::VILLAGER,
        roles::VILLAGER,
    ]
}

// =============================================================================
// Effect Conditions
// =============================================================================

#[test]
fn test_martyr_execution_hands_win_to_other_side() {
    let ruleset = sample::ruleset().unwrap();
    let game = start_day(&sample_game(&ruleset, &martyr_table())).unwrap();

    let (game, winner) = committed(submit_intent(&game, Intent::execute(p(1)), &ruleset));

    assert_eq!(winner, Some(Alignment::Evil));
    assert_eq!(game.state().phase, Phase::Over { winner: Alignment::Evil });
    assert_eq!(game.latest().unwrap().kind(), &HistoryKind::GameOver);
    assert!(game.is_consistent());
}

#[test]
fn test_evil_martyr_execution_hands_win_to_good() {
    let ruleset = sample::ruleset().unwrap();
    let game = setup_game(
        martyr_table().into_iter().enumerate().map(|(i, role)| {
            let player = Player::new(p(i as u32), format!("P{}", i), role);
            if i == 1 {
                player.with_alignment(Alignment::Evil)
            } else {
                player
            }
        }),
        &ruleset,
    )
    .unwrap();

    let (_, winner) = committed(submit_intent(&game, Intent::execute(p(1)), &ruleset));
    assert_eq!(winner, Some(Alignment::Good));
}

#[test]
fn test_martyr_killed_at_night_is_not_a_win() {
    let ruleset = sample::ruleset().unwrap();
    let game = sample_game(&ruleset, &martyr_table());

    let (game, winner) = committed(submit_intent(
        &game,
        Intent::kill(p(0), p(1), Cause::Demon),
        &ruleset,
    ));

    assert_eq!(winner, None);
    assert!(!game.state().is_alive(p(1)));
    assert_eq!(game.state().phase, Phase::Night { round: 1 });
}

#[test]
fn test_other_execution_does_not_trigger_martyrdom() {
    let ruleset = sample::ruleset().unwrap();
    let game = start_day(&sample_game(&ruleset, &martyr_table())).unwrap();

    let (_, winner) = committed(submit_intent(&game, Intent::execute(p(3)), &ruleset));
    assert_eq!(winner, None);
}

// =============================================================================
// Built-in Conditions
// =============================================================================

#[test]
fn test_demon_execution_wins_for_good() {
    let ruleset = sample::ruleset().unwrap();
    let game = start_day(&sample_game(&ruleset, &martyr_table())).unwrap();

    let (game, winner) = committed(submit_intent(&game, Intent::execute(p(0)), &ruleset));
    assert_eq!(winner, Some(Alignment::Good));
    assert_eq!(game.state().phase, Phase::Over { winner: Alignment::Good });
}

#[test]
fn test_parity_wins_for_evil() {
    let ruleset = sample::ruleset().unwrap();
    let game = sample_game(&ruleset, &[roles::DEMON, roles::VILLAGER, roles::VILLAGER]);

    let (_, winner) = committed(submit_intent(
        &game,
        Intent::kill(p(0), p(2), Cause::Demon),
        &ruleset,
    ));
    assert_eq!(winner, Some(Alignment::Evil));
}

#[test]
fn test_builtins_can_be_disabled() {
    let ruleset = sample::ruleset_with(EngineConfig::new().without_builtin_win_conditions()).unwrap();
    let game = start_day(&sample_game(&ruleset, &martyr_table())).unwrap();

    let (game, winner) = committed(submit_intent(&game, Intent::execute(p(0)), &ruleset));
    assert_eq!(winner, None);
    assert_eq!(game.state().phase, Phase::Day { round: 1 });
}

#[test]
fn test_finished_game_is_not_rechecked() {
    let ruleset = sample::ruleset().unwrap();
    let game = start_day(&sample_game(&ruleset, &martyr_table())).unwrap();
    let (over, _) = committed(submit_intent(&game, Intent::execute(p(0)), &ruleset));
    let entries = over.history_len();

    let (after, winner) = committed(submit_intent(&over, Intent::execute(p(2)), &ruleset));
    assert_eq!(winner, None);
    assert_eq!(after.state().phase, Phase::Over { winner: Alignment::Good });
    // The execution is recorded, but no second game-over entry is.
    assert_eq!(after.history_len(), entries + 1);
}

// =============================================================================
// Timing and Fault Isolation
// =============================================================================

const BROKEN: EffectId = EffectId::from_static("broken");
const CROWN: EffectId = EffectId::from_static("crown");
const DUSK: EffectId = EffectId::from_static("dusk");

struct Broken;

impl WinCondition for Broken {
    fn check(&self, ctx: &WinContext<'_>) -> RuleResult<Option<Alignment>> {
        Err(RuleError::win_check(ctx.instance.effect.clone(), "cannot decide"))
    }
}

/// Good wins whenever the holder is alive.
struct Crown;

impl WinCondition for Crown {
    fn check(&self, ctx: &WinContext<'_>) -> RuleResult<Option<Alignment>> {
        Ok(ctx.owner.is_alive().then_some(Alignment::Good))
    }
}

/// Evil wins when the day ends.
struct Dusk;

impl WinCondition for Dusk {
    fn timing(&self) -> WinTiming {
        WinTiming::EndOfDay
    }

    fn check(&self, _ctx: &WinContext<'_>) -> RuleResult<Option<Alignment>> {
        Ok(Some(Alignment::Evil))
    }
}

fn condition_ruleset() -> Ruleset {
    let mut effects = EffectRegistry::new();
    effects
        .register(EffectDefinition::new(BROKEN, "Broken").with_win_condition(Broken))
        .unwrap();
    effects
        .register(EffectDefinition::new(CROWN, "Crown").with_win_condition(Crown))
        .unwrap();
    effects
        .register(EffectDefinition::new(DUSK, "Dusk").with_win_condition(Dusk))
        .unwrap();
    Ruleset::new(effects, RoleRegistry::new(), EngineConfig::default()).unwrap()
}

fn condition_game(ruleset: &Ruleset, first: EffectId, second: EffectId) -> Game {
    let players = vec![
        Player::new(p(0), "P0", roles::VILLAGER).with_effect(EffectInstance::new(first)),
        Player::new(p(1), "P1", roles::VILLAGER).with_effect(EffectInstance::new(second)),
        Player::new(p(2), "P2", roles::VILLAGER),
    ];
    sample_game_from(ruleset, players)
}

fn sample_game_from(ruleset: &Ruleset, players: Vec<Player>) -> Game {
    start_day(&reveal_roles(&setup_game(players, ruleset).unwrap()).unwrap()).unwrap()
}

#[test]
fn test_failing_condition_is_skipped() {
    let ruleset = condition_ruleset();
    let game = condition_game(&ruleset, BROKEN, CROWN);

    assert_eq!(
        check_win_condition(game.state(), &game, &ruleset),
        Some(Alignment::Good)
    );
}

#[test]
fn test_failing_condition_alone_names_no_winner() {
    let ruleset = condition_ruleset();
    let game = condition_game(&ruleset, BROKEN, DUSK);

    assert_eq!(check_win_condition(game.state(), &game, &ruleset), None);
}

#[test]
fn test_end_of_day_condition_waits_for_day_end() {
    let ruleset = condition_ruleset();
    let game = condition_game(&ruleset, DUSK, BROKEN);

    assert_eq!(check_win_condition(game.state(), &game, &ruleset), None);
    assert_eq!(
        check_end_of_day_win_conditions(game.state(), &game, &ruleset),
        Some(Alignment::Evil)
    );

    let over = end_day(&game, &ruleset).unwrap();
    assert_eq!(over.state().phase, Phase::Over { winner: Alignment::Evil });

    let kinds: Vec<_> = over.history().rev().take(2).map(|e| e.kind().clone()).collect();
    assert_eq!(kinds, vec![HistoryKind::GameOver, HistoryKind::DayEnded]);
}

#[test]
fn test_after_change_condition_ignored_at_day_end() {
    let ruleset = condition_ruleset();
    let game = condition_game(&ruleset, CROWN, BROKEN);

    assert_eq!(check_end_of_day_win_conditions(game.state(), &game, &ruleset), None);
    let ended = end_day(&game, &ruleset).unwrap();
    assert_eq!(ended.state().phase, Phase::Day { round: 1 });
}
