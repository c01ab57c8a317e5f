//! State change and snapshot integration tests.
//!
//! Covers batch composition, history derivability across a played game,
//! and lossless snapshot codecs.

use proptest::prelude::*;
use serde_json::json;

use grimoire::changes::StateChanges;
use grimoire::core::{
    EffectId, EffectInstance, Expiry, Game, GameState, HistoryEvent, HistoryKind, Phase, Player,
    PlayerId, RoleId,
};
use grimoire::error::RuleError;
use grimoire::games::sample::{self, effects, roles};
use grimoire::pipeline::{resolve_intent, Cause, Intent};
use grimoire::turn::{reveal_roles, setup_game, start_day, start_night};

fn p(id: u32) -> PlayerId {
    PlayerId::new(id)
}

fn blank_game(n: u32) -> Game {
    let state = GameState::new(
        (0..n).map(|i| Player::new(p(i), format!("P{}", i), roles::VILLAGER)),
    )
    .unwrap();
    Game::new(state)
}

/// A sample game played through a first night and a demon kill.
fn played_game() -> Game {
    let ruleset = sample::ruleset().unwrap();
    let game = setup_game(
        [roles::DEMON, roles::GUARDIAN, roles::MAYOR, roles::OUTCAST]
            .into_iter()
            .enumerate()
            .map(|(i, role)| Player::new(p(i as u32), format!("P{}", i), role)),
        &ruleset,
    )
    .unwrap();
    let game = reveal_roles(&game).unwrap();
    let game = game.apply(
        StateChanges::new()
            .with_effect(p(3), EffectInstance::new(effects::SAFE).with_expiry(Expiry::EndOfNight)),
    );

    let resolution = resolve_intent(
        Intent::kill(p(0), p(1), Cause::Demon),
        game.state(),
        &game,
        &ruleset,
    );
    let game = game.apply(resolution.into_changes().unwrap());
    start_day(&game).unwrap()
}

// =============================================================================
// Batch Semantics
// =============================================================================

#[test]
fn test_batch_is_atomic_in_history() {
    let game = blank_game(3);
    let next = game.apply(
        StateChanges::new()
            .with_effect(p(0), EffectInstance::new(EffectId::DEAD))
            .with_effect(p(1), EffectInstance::new(EffectId::DEAD))
            .with_event(HistoryEvent::new(HistoryKind::PlayerDied, "a").about(p(0)))
            .with_event(HistoryEvent::new(HistoryKind::PlayerDied, "b").about(p(1))),
    );

    // Both entries see the whole batch; there is no half-applied state.
    let entries: Vec<_> = next.history().skip(1).collect();
    assert_eq!(entries.len(), 2);
    for entry in entries {
        assert!(entry.state_before.is_alive(p(0)));
        assert!(entry.state_before.is_alive(p(1)));
        assert!(!entry.state_after.is_alive(p(0)));
        assert!(!entry.state_after.is_alive(p(1)));
    }
}

#[test]
fn test_effect_upsert_keeps_single_instance() {
    let game = blank_game(2).apply(
        StateChanges::new()
            .with_effect(p(0), EffectInstance::new(effects::SAFE))
            .with_effect(p(0), EffectInstance::new(effects::SAFE).with_source(p(1))),
    );

    let player = game.state().player(p(0)).unwrap();
    assert_eq!(player.effect_count(), 1);
    assert_eq!(player.effect(&effects::SAFE).unwrap().source, Some(p(1)));
}

#[test]
fn test_removing_missing_effect_is_noop() {
    let game = blank_game(2);
    let next = game.apply(StateChanges::new().without_effect(p(0), effects::SAFE));

    assert_eq!(next.state(), game.state());
    assert!(next.is_consistent());
}

#[test]
fn test_merged_add_then_remove_leaves_effect_absent() {
    let game = blank_game(2);
    let mut merged = StateChanges::new().with_effect(p(1), EffectInstance::new(effects::SAFE));
    merged.merge(StateChanges::new().without_effect(p(1), effects::SAFE));

    let next = game.apply(merged);
    assert!(!next.state().player(p(1)).unwrap().has_effect(&effects::SAFE));
}

#[test]
fn test_seating_order_survives_changes() {
    let game = blank_game(5).apply(
        StateChanges::new()
            .with_role(p(2), roles::DEMON)
            .with_effect(p(4), EffectInstance::new(EffectId::DEAD)),
    );

    let seats: Vec<_> = game.state().players().map(|player| player.id).collect();
    assert_eq!(seats, vec![p(0), p(1), p(2), p(3), p(4)]);
}

// =============================================================================
// History Derivability
// =============================================================================

#[test]
fn test_played_game_is_consistent() {
    let game = played_game();
    assert!(game.is_consistent());
    assert_eq!(game.state().phase, Phase::Day { round: 1 });
    assert!(!game.state().is_alive(p(1)));

    // Each entry's before state is the previous entry's after state.
    let entries: Vec<_> = game.history().collect();
    for pair in entries.windows(2) {
        assert_eq!(pair[1].id, pair[0].id + 1);
        assert!(
            pair[1].state_before == pair[0].state_after || pair[1].state_before == pair[0].state_before,
            "entry {} does not chain from entry {}",
            pair[1].id,
            pair[0].id
        );
    }
}

#[test]
fn test_night_expiry_survives_until_next_night() {
    let day = played_game();
    assert!(day.state().player(p(3)).unwrap().has_effect(&effects::SAFE));

    let night = start_night(&day).unwrap();
    assert!(!night.state().player(p(3)).unwrap().has_effect(&effects::SAFE));
    assert!(night.state().player(p(3)).unwrap().has_effect(&effects::MISREGISTER));
    assert_eq!(night.state().phase, Phase::Night { round: 2 });
}

// =============================================================================
// Snapshot Codecs
// =============================================================================

#[test]
fn test_json_snapshot_round_trip() {
    let game = played_game();
    let json = game.to_json().unwrap();
    let back = Game::from_json(&json).unwrap();

    assert_eq!(back, game);
    assert_eq!(back.to_json().unwrap(), json);
}

#[test]
fn test_binary_snapshot_round_trip() {
    let game = played_game();
    let bytes = game.to_bytes().unwrap();
    let back = Game::from_bytes(&bytes).unwrap();

    assert_eq!(back, game);
    assert_eq!(back.to_bytes().unwrap(), bytes);
}

#[test]
fn test_tampered_snapshot_rejected() {
    let game = played_game();
    let mut value: serde_json::Value = serde_json::from_str(&game.to_json().unwrap()).unwrap();
    value["current_state"]["phase"] = json!({ "night": { "round": 7 } });

    let result = Game::from_json(&value.to_string());
    assert!(matches!(result, Err(RuleError::InconsistentSnapshot)));
}

#[test]
fn test_garbage_snapshot_is_decode_error() {
    assert!(matches!(Game::from_json("{not json"), Err(RuleError::Json(_))));
    assert!(matches!(Game::from_bytes(&[1, 2, 3]), Err(RuleError::Binary(_))));
}

// =============================================================================
// Property Tests
// =============================================================================

#[derive(Clone, Debug)]
enum Op {
    Add(EffectId),
    Remove(EffectId),
    Role(RoleId),
}

fn any_op() -> impl Strategy<Value = Op> {
    let effect = prop_oneof![
        Just(effects::SAFE),
        Just(effects::BOUNCE),
        Just(EffectId::DEAD),
    ];
    let role = prop_oneof![Just(roles::VILLAGER), Just(roles::DEMON), Just(roles::HEIR)];
    prop_oneof![
        effect.clone().prop_map(Op::Add),
        effect.prop_map(Op::Remove),
        role.prop_map(Op::Role),
    ]
}

fn batch(ops: &[(u32, Op)]) -> StateChanges {
    let mut changes = StateChanges::new();
    for (player, op) in ops {
        match op {
            Op::Add(effect) => changes.add_effect(p(*player), EffectInstance::new(effect.clone())),
            Op::Remove(effect) => changes.remove_effect(p(*player), effect.clone()),
            Op::Role(role) => changes.change_role(p(*player), role.clone()),
        }
    }
    changes
}

proptest! {
    #[test]
    fn prop_disjoint_batches_compose(
        first in proptest::collection::vec((0u32..3, any_op()), 0..8),
        second in proptest::collection::vec((3u32..6, any_op()), 0..8),
    ) {
        let game = blank_game(6);

        let sequential = game.apply(batch(&first)).apply(batch(&second));

        let mut merged = batch(&first);
        merged.merge(batch(&second));
        let combined = game.apply(merged);

        prop_assert_eq!(sequential.state(), combined.state());
        prop_assert!(sequential.is_consistent());
        prop_assert!(combined.is_consistent());
    }

    #[test]
    fn prop_overlapping_batches_compose(
        first in proptest::collection::vec((0u32..3, any_op()), 0..8),
        second in proptest::collection::vec((0u32..3, any_op()), 0..8),
    ) {
        let game = blank_game(3);

        let sequential = game.apply(batch(&first)).apply(batch(&second));

        let mut merged = batch(&first);
        merged.merge(batch(&second));
        let combined = game.apply(merged);

        prop_assert_eq!(sequential.state(), combined.state());
    }

    #[test]
    fn prop_apply_never_reseats(ops in proptest::collection::vec((0u32..8, any_op()), 0..16)) {
        let game = blank_game(6);
        let next = game.apply(batch(&ops));

        prop_assert_eq!(next.state().player_count(), 6);
        let seats: Vec<_> = next.state().players().map(|player| player.id).collect();
        prop_assert_eq!(seats, (0..6).map(p).collect::<Vec<_>>());
    }
}
