//! Property tests over random command scripts.
//!
//! Every script is applied to a real game; the invariants below must hold
//! after any sequence of commands, legal or not.

use std::collections::HashSet;

use proptest::prelude::*;

use fleet_core::combat::{calculate_damage, crew_casualties, repair_downtime_for};
use fleet_core::prelude::*;
use fleet_test_utils::actions::run_script;
use fleet_test_utils::determinism::strategies::{
    arb_action_sequence, arb_damage, arb_ship_class, arb_starbase_class,
};
use fleet_test_utils::determinism::verify_script_determinism;
use fleet_test_utils::fixtures::{siege, standard_game};

/// Check the structural invariants of a game.
fn assert_consistent(game: &Game) {
    let mut seen_ships = HashSet::new();
    let mut seen_bases = HashSet::new();

    for player in [Player::One, Player::Two] {
        let fleet = game.fleet(player);

        for ship in fleet.starships() {
            assert!(seen_ships.insert(ship.id()), "duplicate ship {}", ship.id());
            assert_eq!(ship.owner(), player);
            assert!(ship.health() > 0, "disabled ship {} left in fleet", ship.id());
            assert!(ship.health() <= ship.max_health());
            assert!(ship.crew() >= 1 && ship.crew() <= ship.max_crew());

            if let Some(base_id) = ship.docked_at() {
                let base = fleet
                    .starbase(base_id)
                    .expect("ship docked at a starbase of another fleet");
                assert!(base.hosts(ship.id()));
                assert_eq!(base.sector(), ship.sector());
            }
        }

        for base in fleet.starbases() {
            assert!(seen_bases.insert(base.id()), "duplicate starbase {}", base.id());
            assert_eq!(base.owner(), player);
            assert!(base.health() > 0 && base.health() <= base.max_health());
            for &docked in base.docked_ships() {
                let ship = fleet.ship(docked).expect("starbase lists a missing ship");
                assert_eq!(ship.docked_at(), Some(base.id()));
            }
        }
    }

    assert_eq!(game.is_game_over(), game.winner().is_some() || both_defeated(game));
}

fn both_defeated(game: &Game) -> bool {
    game.fleet(Player::One).is_defeated() && game.fleet(Player::Two).is_defeated()
}

proptest! {
    #[test]
    fn test_random_scripts_keep_the_game_consistent(actions in arb_action_sequence(120)) {
        let mut game = standard_game();
        run_script(&mut game, &actions);
        assert_consistent(&game);
    }

    #[test]
    fn test_random_scripts_on_a_siege_keep_the_game_consistent(
        garrison in 0u32..4,
        actions in arb_action_sequence(80),
    ) {
        let mut game = siege(3, garrison).0;
        run_script(&mut game, &actions);
        assert_consistent(&game);
    }

    #[test]
    fn test_random_scripts_are_deterministic(actions in arb_action_sequence(60)) {
        let result = verify_script_determinism(standard_game, &actions);
        prop_assert!(result.is_deterministic);
    }

    #[test]
    fn test_damage_never_below_minimum(attack in 0u32..200, defence in 0u32..200) {
        let damage = calculate_damage(attack, defence);
        prop_assert!(damage >= 5);
        prop_assert!(damage >= attack.saturating_sub(defence));
    }

    #[test]
    fn test_casualties_never_exceed_crew(damage in arb_damage(), class in arb_ship_class()) {
        let lost = crew_casualties(damage.min(class.max_health), class.max_crew, class.max_health);
        prop_assert!(lost <= class.max_crew);
    }

    #[test]
    fn test_downtime_is_between_one_and_four(class in arb_ship_class(), damage in arb_damage()) {
        let health = class.max_health.saturating_sub(damage).max(1);
        let downtime = repair_downtime_for(health, class.max_health);
        prop_assert!((1..=4).contains(&downtime));
    }

    #[test]
    fn test_strength_scales_down_with_damage(class in arb_ship_class()) {
        let mut game = Game::from_setup(&GameSetup {
            player_one: Roster {
                starbases: vec![fleet_core::data::StarbasePlacement {
                    sector: "Sector 1".into(),
                    class: StarbaseClass::STANDARD,
                }],
                starships: vec![fleet_core::data::ShipPlacement {
                    sector: "Sector 1".into(),
                    class: ShipClass::STANDARD,
                    count: 1,
                }],
            },
            player_two: Roster {
                starbases: vec![fleet_core::data::StarbasePlacement {
                    sector: "Sector 2".into(),
                    class: StarbaseClass::STANDARD,
                }],
                starships: vec![fleet_core::data::ShipPlacement {
                    sector: "Sector 1".into(),
                    class,
                    count: 1,
                }],
            },
        })
        .expect("valid rosters");

        let attacker = game.fleet(Player::One).starships()[0].id();
        let target = game.fleet(Player::Two).starships()[0].id();
        let before = game
            .ship(target)
            .map(|s| (s.current_attack_strength(), s.current_defence_strength()));

        let strike = game.attack(attacker, target).into_applied().expect("in range");
        prop_assert!(strike.damage >= 5);

        if let Some(ship) = game.ship(target) {
            let (attack, defence) = before.expect("target existed");
            prop_assert!(ship.current_attack_strength() <= attack);
            prop_assert!(ship.current_defence_strength() <= defence);
        } else {
            prop_assert!(strike.destroyed);
        }
    }

    #[test]
    fn test_garrison_defence_never_below_bare_defence(
        class in arb_starbase_class(),
        garrison in 0u32..5,
    ) {
        let mut game = siege(0, garrison).0;
        let base = game.found_starbase(Player::Two, "Sector 4", class);
        let bare = game.starbase_defence(base).expect("new starbase");
        prop_assert_eq!(bare, class.max_defence);

        for _ in 0..garrison {
            let ship = game.commission_ship(Player::Two, "Sector 4", ShipClass::STANDARD);
            prop_assert!(game.dock(ship, base).is_applied());
        }
        let defended = game.starbase_defence(base).expect("starbase");
        prop_assert!(defended >= bare);
    }
}
