//! End-to-end flows over a populated in-memory store: gate a scene, play
//! cards against their bindings, resolve the outcome into a payout.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use sultan_domain::{
    Attribute, AttributeRequirements, AttributeTotals, BasicRewards, BindingType, Card,
    CardBinding, CardCategory, CardId, CardRarity, CardReward, ExtendedRewards, Faction, Npc,
    NpcId, NpcReward, RewardSpec, Scene, SceneCategory, SceneId, Tier,
};

use crate::store::MemoryStore;
use crate::use_cases::card_play::{CardUsage, PlayCard, ScenePlayTracker, UnboundCardPolicy};
use crate::use_cases::gating::{EnterScene, PlayerSnapshot};
use crate::use_cases::prereq::ValidatePrerequisites;
use crate::use_cases::reward::{ResolveRewards, SceneOutcome};
use crate::use_cases::{UseDecision, UseDenied};

/// Best-effort tracing init so `RUST_LOG=debug cargo test` shows the
/// engine's evaluation logs.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn active_scene(id: &str) -> Scene {
    let mut scene = Scene::new(SceneId::new(id), id, SceneCategory::MainStory);
    scene.activate().expect("fresh scene activates");
    scene
}

fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();

    store
        .put_card(Card::new(
            CardId::new("court_pass"),
            "Court Pass",
            CardRarity::Rare,
            CardCategory::Access,
        ))
        .expect("card");
    store
        .put_card(Card::new(
            CardId::new("bribe_gold"),
            "Bribe Gold",
            CardRarity::Common,
            CardCategory::Influence,
        ))
        .expect("card");
    store
        .put_npc(
            Npc::new(
                NpcId::new("recruit_omar"),
                "Recruit Omar",
                Faction::Military,
                Tier::Bronze,
            )
            .with_player_npc(true),
        )
        .expect("npc");

    // S1: strength >= 50, nothing else.
    store.put_scene(active_scene("s1")).expect("scene");
    store
        .put_requirements(
            SceneId::new("s1"),
            AttributeRequirements::new().with(Attribute::Strength, 50),
        )
        .expect("requirements");

    // S2: requires completing S1.
    store
        .put_scene(active_scene("s2").with_prerequisites(vec![SceneId::new("s1")]))
        .expect("scene");

    // S3: reward scene with bindings.
    store.put_scene(active_scene("s3")).expect("scene");
    store
        .put_binding(
            CardBinding::new(
                SceneId::new("s3"),
                CardId::new("court_pass"),
                BindingType::Required,
            ),
        )
        .expect("binding");
    store
        .put_binding(
            CardBinding::new(
                SceneId::new("s3"),
                CardId::new("bribe_gold"),
                BindingType::Optional,
            )
            .with_max_uses(1)
            .with_cooldown(2)
            .with_effect_modifier(1.5),
        )
        .expect("binding");
    store
        .put_reward_spec(
            RewardSpec::new(SceneId::new("s3"))
                .with_basic(BasicRewards {
                    success_gold: 10,
                    failure_reputation: -5,
                    ..BasicRewards::default()
                })
                .with_extended(ExtendedRewards {
                    success_gold: 20,
                    failure_gold: 15,
                    performance_multiplier: 1.0,
                    reward_cards: vec![CardReward::new(CardId::new("bribe_gold"), 1, 1.0)],
                    reward_npcs: vec![NpcReward::new(NpcId::new("recruit_omar"), 1, 1.0)],
                    unlocked_scenes: vec![SceneId::new("s2")],
                    ..ExtendedRewards::default()
                }),
        )
        .expect("reward spec");

    Arc::new(store)
}

#[test]
fn scenario_a_insufficient_strength_is_itemized() {
    let store = seeded_store();
    let gate = EnterScene::new(store);

    let snapshot = PlayerSnapshot::new()
        .with_attribute_totals(AttributeTotals::new().with(Attribute::Strength, 40));
    let decision = gate.execute(&SceneId::new("s1"), &snapshot).expect("gate");

    assert!(!decision.admitted());
    assert_eq!(decision.failed_attributes.len(), 1);
    assert_eq!(decision.failed_attributes[0].attribute, Attribute::Strength);
    assert_eq!(decision.failed_attributes[0].required, 50);
    assert_eq!(decision.failed_attributes[0].actual, 40);
}

#[test]
fn scenario_b_prerequisite_completion_flips_the_decision() {
    let store = seeded_store();
    let gate = EnterScene::new(store);
    let scene_id = SceneId::new("s2");

    let before = gate
        .execute(&scene_id, &PlayerSnapshot::new())
        .expect("gate");
    assert!(!before.admitted());
    assert_eq!(before.missing_prerequisites, vec![SceneId::new("s1")]);

    let after = gate
        .execute(
            &scene_id,
            &PlayerSnapshot::new().with_completed_scenes(vec![SceneId::new("s1")]),
        )
        .expect("gate");
    assert!(after.admitted(), "reasons: {:?}", after.reasons());
}

#[test]
fn scenario_c_gold_accumulates_across_layers() {
    let store = seeded_store();
    let resolver = ResolveRewards::new(store);

    let payout = resolver
        .execute(
            &SceneId::new("s3"),
            SceneOutcome::Success,
            0.5,
            &mut StdRng::seed_from_u64(1),
        )
        .expect("resolve");

    // 10 basic + floor(20 * 1.0 * 0.5) extended
    assert_eq!(payout.gold, 20);
}

#[test]
fn scenario_d_single_use_binding_rejects_the_second_play() {
    let store = seeded_store();
    let play = PlayCard::new(store);
    let scene_id = SceneId::new("s3");
    let card_id = CardId::new("bribe_gold");
    let mut tracker = ScenePlayTracker::new();

    let first = play
        .execute(
            &scene_id,
            &card_id,
            tracker.usage(&card_id),
            1,
            UnboundCardPolicy::Reject,
        )
        .expect("play");
    assert!(first.is_legal());
    tracker.record_use(&card_id, 1);

    let second = play
        .execute(
            &scene_id,
            &card_id,
            tracker.usage(&card_id),
            1,
            UnboundCardPolicy::Reject,
        )
        .expect("play");
    assert!(matches!(
        second,
        UseDecision::Denied(UseDenied::ExceededUses { .. })
    ));
}

#[test]
fn full_playthrough_gate_play_resolve() {
    init_tracing();
    let store = seeded_store();
    let gate = EnterScene::new(store.clone());
    let play = PlayCard::new(store.clone());
    let resolver = ResolveRewards::new(store);
    let scene_id = SceneId::new("s3");

    // Entry requires the court pass in the party's pool.
    let without_pass = gate
        .execute(&scene_id, &PlayerSnapshot::new())
        .expect("gate");
    assert_eq!(
        without_pass.missing_required_cards,
        vec![CardId::new("court_pass")]
    );

    let snapshot = PlayerSnapshot::new().with_cards(vec![CardId::new("court_pass")]);
    assert!(gate.execute(&scene_id, &snapshot).expect("gate").admitted());

    // Play the optional card once; its modifier feeds the caller's effect.
    let decision = play
        .execute(
            &scene_id,
            &CardId::new("bribe_gold"),
            CardUsage::default(),
            0,
            UnboundCardPolicy::Reject,
        )
        .expect("play");
    match decision {
        UseDecision::Legal {
            effect_modifier, ..
        } => assert_eq!(effect_modifier, 1.5),
        other => panic!("expected legal use, got {:?}", other),
    }

    // Resolve at full performance: both certain pool entries grant.
    let payout = resolver
        .execute(
            &scene_id,
            SceneOutcome::Success,
            1.0,
            &mut StdRng::seed_from_u64(9),
        )
        .expect("resolve");
    assert_eq!(payout.gold, 30);
    assert_eq!(payout.cards.len(), 1);
    assert_eq!(payout.npcs.len(), 1);
    assert_eq!(payout.unlocked_scenes, vec![SceneId::new("s2")]);

    // Failure path: flat penalties, no grants.
    let failure = resolver
        .execute(
            &scene_id,
            SceneOutcome::Failure,
            1.0,
            &mut StdRng::seed_from_u64(9),
        )
        .expect("resolve");
    assert_eq!(failure.reputation, -5);
    assert_eq!(failure.gold, -15);
    assert!(failure.cards.is_empty());
}

#[test]
fn graph_validation_over_the_whole_store() {
    let store = seeded_store();
    // A forward reference to an unwritten scene is tolerated at write time
    // but reported by the validator.
    store
        .put_scene(active_scene("s4").with_prerequisites(vec![SceneId::new("s9")]))
        .expect("scene");

    let report = ValidatePrerequisites::new(store).execute().expect("report");
    assert!(report.cycles.is_empty());
    assert_eq!(report.dangling.len(), 1);
    assert_eq!(report.dangling[0].missing, SceneId::new("s9"));
}

#[test]
fn edits_are_visible_on_the_next_call() {
    let store = seeded_store();
    let gate = EnterScene::new(store.clone());
    let scene_id = SceneId::new("s1");

    let snapshot = PlayerSnapshot::new()
        .with_attribute_totals(AttributeTotals::new().with(Attribute::Strength, 40));
    assert!(!gate.execute(&scene_id, &snapshot).expect("gate").admitted());

    // Designer lowers the bar; the same snapshot is now admitted.
    store
        .put_requirements(
            scene_id.clone(),
            AttributeRequirements::new().with(Attribute::Strength, 30),
        )
        .expect("requirements");
    assert!(gate.execute(&scene_id, &snapshot).expect("gate").admitted());
}
