//! Contention tests for draws against the shared in-memory store.

#[path = "support/app.rs"]
mod app_support;

use std::thread;

use gacha_backend::domain::ports::{GachaCommand, GachaQuery};
use gacha_backend::domain::{ErrorCode, Player, Rarity, Username};
use gacha_backend::outbound::memory::StartingBalances;
use rstest::rstest;

const THREADS: usize = 8;

#[rstest]
#[case(StartingBalances { default_user: 160 * 37, new_user: 0 }, 37)]
#[case(StartingBalances { default_user: 159, new_user: 0 }, 0)]
fn racing_single_draws_spend_exactly_the_balance(
    #[case] balances: StartingBalances,
    #[case] affordable: usize,
) {
    let service = app_support::service_with(balances, 11);

    let outcomes: Vec<(usize, usize)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    let mut won = 0;
                    let mut refused = 0;
                    for _ in 0..10 {
                        match service.single_draw(&Player::Default) {
                            Ok(_) => won += 1,
                            Err(error) => {
                                assert_eq!(error.code(), ErrorCode::InsufficientFunds);
                                refused += 1;
                            }
                        }
                    }
                    (won, refused)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("draw thread"))
            .collect()
    });

    let won: usize = outcomes.iter().map(|(won, _)| won).sum();
    assert_eq!(won, affordable);
    let info = service.user_info(&Player::Default).expect("default player");
    assert_eq!(info.currency, balances.default_user - 160 * affordable as u64);
}

#[test]
fn players_do_not_share_balances_under_contention() {
    let service = app_support::service_with(
        StartingBalances {
            default_user: 1_600 * 4,
            new_user: 1_600 * 2,
        },
        23,
    );
    let names = ["ann", "ben", "cid"];
    for name in names {
        service.register(name).expect("register");
    }

    let shared = &service;
    let successes: Vec<usize> = thread::scope(|scope| {
        let mut workers: Vec<_> = names
            .iter()
            .map(|name| {
                scope.spawn(move || {
                    let player = Player::named(Username::new(*name).expect("valid username"));
                    (0..5)
                        .filter(|_| shared.ten_draw(&player).is_ok())
                        .count()
                })
            })
            .collect();
        workers.push(scope.spawn(move || {
            (0..5)
                .filter(|_| shared.ten_draw(&Player::Default).is_ok())
                .count()
        }));
        workers
            .into_iter()
            .map(|worker| worker.join().expect("draw worker"))
            .collect()
    });
    assert_eq!(successes, vec![2, 2, 2, 4]);

    for name in names {
        let player = Player::named(Username::new(name).expect("valid username"));
        let info = service.user_info(&player).expect("registered player");
        assert_eq!(info.currency, 0, "{name}");
    }
    let default = service.user_info(&Player::Default).expect("default player");
    assert_eq!(default.currency, 0);
}

#[test]
fn every_ten_draw_under_contention_contains_rare_or_above() {
    let service = app_support::service_with(
        StartingBalances {
            default_user: 1_600 * 40,
            new_user: 0,
        },
        31,
    );

    let batches: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    (0..10)
                        .filter_map(|_| service.ten_draw(&Player::Default).ok())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().expect("draw thread"))
            .collect()
    });

    assert_eq!(batches.len(), 40);
    for batch in &batches {
        assert_eq!(batch.characters.len(), 10);
        assert!(
            batch
                .characters
                .iter()
                .any(|character| character.rarity() != Rarity::Common)
        );
    }
    let inventory = service.inventory(&Player::Default).expect("inventory");
    assert!(inventory.count <= 11);
}
