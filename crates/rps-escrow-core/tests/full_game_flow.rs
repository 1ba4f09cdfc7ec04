//! Integration tests for the full game flow.
//!
//! These tests drive complete game sessions from deposit to withdrawal and
//! check that value is only ever moved, never created or lost.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rps_escrow_core::{
    Escrow, EscrowError, GamePhase, ManualClock, Move, Outcome, OutcomeEvent, Rejection,
    TIMEOUT_WINDOW,
};
use rps_token::{Address, MockTokenClient};
use std::sync::Arc;

struct Harness {
    escrow: Arc<Escrow>,
    token: MockTokenClient,
    clock: Arc<ManualClock>,
}

impl Harness {
    fn new() -> Self {
        let token = MockTokenClient::new(Address::random());
        let clock = Arc::new(ManualClock::new(1_700_000_000));
        let escrow = Arc::new(Escrow::new(Arc::new(token.clone()), clock.clone()));
        Self {
            escrow,
            token,
            clock,
        }
    }

    async fn player(&self, deposit: u64) -> Address {
        let account = Address::random();
        self.token.mint(account, deposit).unwrap();
        self.escrow.deposit(account, deposit).await.unwrap();
        account
    }

    /// Custody must hold exactly what the ledger accounts for
    fn assert_conserved(&self) {
        let audit = self.escrow.audit();
        assert_eq!(
            u128::from(self.token.balance(&self.escrow.ledger().custody())),
            audit.total(),
            "custody balance diverged from ledger: {audit:?}"
        );
    }
}

/// Two players deposit, play ROCK vs PAPER, and cash out
#[tokio::test]
async fn test_full_game_paper_wins_and_withdraw() {
    let h = Harness::new();
    let alice = h.player(25_000).await;
    let bob = h.player(25_000).await;

    let game_id = h.escrow.create_game(alice, 10).unwrap();
    h.escrow.join_game(bob, game_id).unwrap();
    h.assert_conserved();

    h.escrow.send_move(alice, game_id, Move::Rock).unwrap();
    h.escrow.send_move(bob, game_id, Move::Paper).unwrap();
    h.assert_conserved();

    assert_eq!(h.escrow.balance_of(&alice), 24_990);
    assert_eq!(h.escrow.balance_of(&bob), 25_010);

    h.escrow.withdraw(bob, 25_010).await.unwrap();
    h.escrow.withdraw(alice, 24_990).await.unwrap();
    assert_eq!(h.token.balance(&bob), 25_010);
    assert_eq!(h.token.balance(&alice), 24_990);
    assert_eq!(h.token.balance(&h.escrow.ledger().custody()), 0);
}

/// Player one moves, player two disappears, either player collects
#[tokio::test]
async fn test_full_game_timeout() {
    let h = Harness::new();
    let alice = h.player(25_000).await;
    let bob = h.player(25_000).await;

    let game_id = h.escrow.create_game(alice, 10).unwrap();
    h.escrow.join_game(bob, game_id).unwrap();
    h.escrow.send_move(alice, game_id, Move::Rock).unwrap();

    h.clock.advance(TIMEOUT_WINDOW);
    assert!(matches!(
        h.escrow.time_out(alice, game_id),
        Err(EscrowError::TimeNotExceeded { .. })
    ));

    h.clock.advance(1);
    assert!(matches!(
        h.escrow.send_move(bob, game_id, Move::Paper),
        Err(EscrowError::TimedOutWindow { .. })
    ));
    h.escrow.time_out(bob, game_id).unwrap();

    assert_eq!(h.escrow.balance_of(&alice), 24_990 + 12);
    assert_eq!(h.escrow.balance_of(&bob), 24_990 + 8);
    assert_eq!(
        h.escrow.events(),
        vec![OutcomeEvent {
            game_id,
            winner: alice
        }]
    );
    h.assert_conserved();
}

/// Independent games interleave without touching each other
#[tokio::test]
async fn test_interleaved_games_stay_independent() {
    let h = Harness::new();
    let alice = h.player(1_000).await;
    let bob = h.player(1_000).await;
    let carol = h.player(1_000).await;

    let g0 = h.escrow.create_game(alice, 100).unwrap();
    let g1 = h.escrow.create_game(bob, 50).unwrap();
    h.escrow.join_game(carol, g0).unwrap();
    h.escrow.join_game(alice, g1).unwrap();

    h.escrow.send_move(alice, g0, Move::Paper).unwrap();
    h.escrow.send_move(alice, g1, Move::Scissors).unwrap();
    h.escrow.send_move(bob, g1, Move::Rock).unwrap();
    h.escrow.send_move(carol, g0, Move::Rock).unwrap();

    assert_eq!(h.escrow.game(g0).unwrap().phase(), GamePhase::Resolved);
    assert_eq!(h.escrow.game(g1).unwrap().phase(), GamePhase::Resolved);

    // g0: alice (paper) beats carol (rock); g1: bob (rock) beats alice (scissors)
    assert_eq!(h.escrow.balance_of(&alice), 1_000 + 100 - 50);
    assert_eq!(h.escrow.balance_of(&bob), 1_000 + 50);
    assert_eq!(h.escrow.balance_of(&carol), 1_000 - 100);

    let winners: Vec<_> = h.escrow.events().iter().map(|e| e.winner).collect();
    assert_eq!(winners, vec![bob, alice]);
    h.assert_conserved();
}

/// Every terminal state rejects every further state-changing call
#[tokio::test]
async fn test_single_settlement() {
    let h = Harness::new();
    let alice = h.player(100).await;
    let bob = h.player(100).await;

    let resolved = h.escrow.create_game(alice, 10).unwrap();
    h.escrow.join_game(bob, resolved).unwrap();
    h.escrow.send_move(alice, resolved, Move::Rock).unwrap();
    h.escrow.send_move(bob, resolved, Move::Rock).unwrap();

    let discarded = h.escrow.create_game(alice, 10).unwrap();
    h.escrow.discard_created_game(alice, discarded).unwrap();

    for game_id in [resolved, discarded] {
        assert!(h.escrow.send_move(alice, game_id, Move::Paper).is_err());
        assert!(h.escrow.time_out(alice, game_id).is_err());
        assert!(h.escrow.discard_created_game(alice, game_id).is_err());
        assert!(h.escrow.join_game(bob, game_id).is_err());
    }

    assert_eq!(h.escrow.balance_of(&alice), 100);
    assert_eq!(h.escrow.balance_of(&bob), 100);
    assert_eq!(h.escrow.events().len(), 1);
    h.assert_conserved();
}

/// Random operation sequences, conservation checked after every step
#[tokio::test]
async fn test_random_sequences_conserve_value() {
    let h = Harness::new();
    let mut rng = StdRng::seed_from_u64(7);
    let mut players = Vec::new();
    for _ in 0..4 {
        players.push(h.player(1_000).await);
    }

    let mut deposited: u64 = 4_000;
    let mut withdrawn: u64 = 0;

    for _ in 0..2_000 {
        let caller = players[rng.gen_range(0..players.len())];
        let next = h.escrow.next_game_id().as_u64();
        let game_id = rps_escrow_core::GameId::new(rng.gen_range(0..=next));

        match rng.gen_range(0..8) {
            0 => {
                let amount = rng.gen_range(0..50);
                h.token.mint(caller, amount).unwrap();
                if h.escrow.deposit(caller, amount).await.is_ok() {
                    deposited += amount;
                }
            }
            1 => {
                let amount = rng.gen_range(0..50);
                if h.escrow.withdraw(caller, amount).await.is_ok() {
                    withdrawn += amount;
                }
            }
            2 => {
                let _ = h.escrow.create_game(caller, rng.gen_range(0..40));
            }
            3 => {
                let _ = h.escrow.join_game(caller, game_id);
            }
            4 => {
                let _ = h.escrow.discard_created_game(caller, game_id);
            }
            5 | 6 => {
                let mv = Move::ALL[rng.gen_range(0..3)];
                let _ = h.escrow.send_move(caller, game_id, mv);
            }
            _ => {
                h.clock.advance(rng.gen_range(0..200));
                let _ = h.escrow.time_out(caller, game_id);
            }
        }

        let audit = h.escrow.audit();
        assert_eq!(audit.total(), u128::from(deposited - withdrawn));
        h.assert_conserved();
    }
}

/// Many games settle in parallel on a multi-threaded runtime
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_games_conserve_value() {
    let h = Harness::new();
    let mut pairs = Vec::new();
    for _ in 0..16 {
        pairs.push((h.player(500).await, h.player(500).await));
    }

    let mut handles = Vec::new();
    for (i, (one, two)) in pairs.iter().copied().enumerate() {
        let escrow = Arc::clone(&h.escrow);
        handles.push(tokio::spawn(async move {
            let mut outcomes = Vec::new();
            for round in 0..20 {
                let game_id = escrow.create_game(one, 7).unwrap();
                escrow.join_game(two, game_id).unwrap();
                escrow
                    .send_move(one, game_id, Move::ALL[(i + round) % 3])
                    .unwrap();
                let receipt = escrow
                    .send_move(two, game_id, Move::ALL[round % 3])
                    .unwrap();
                outcomes.push(receipt);
            }
            escrow.withdraw(one, 1).await.unwrap();
            outcomes
        }));
    }

    let mut settled = 0;
    for handle in handles {
        settled += handle.await.unwrap().len();
    }

    assert_eq!(settled, 16 * 20);
    assert_eq!(h.escrow.events().len(), 16 * 20);
    assert_eq!(h.escrow.next_game_id().as_u64(), 16 * 20);
    assert_eq!(h.escrow.audit().locked, 0);
    assert_eq!(h.escrow.audit().total(), 16 * 1_000 - 16);
    h.assert_conserved();
}

/// Rejections leave the escrow exactly as it was
#[tokio::test]
async fn test_rejections_do_not_mutate_state() {
    let h = Harness::new();
    let alice = h.player(20).await;
    let bob = h.player(5).await;

    let game_id = h.escrow.create_game(alice, 10).unwrap();
    let before = h.escrow.game(game_id).unwrap();

    let err = h.escrow.join_game(bob, game_id).unwrap_err();
    assert_eq!(err.rejection(), Some(Rejection::InsufficientFunds));
    assert!(h.escrow.create_game(bob, 6).is_err());
    assert!(h.escrow.withdraw(bob, 6).await.is_err());
    assert!(h.escrow.deposit(bob, 1).await.is_err());
    assert!(h.escrow.send_move(alice, game_id, Move::Rock).is_err());
    assert!(h.escrow.time_out(alice, game_id).is_err());

    assert_eq!(h.escrow.game(game_id).unwrap(), before);
    assert_eq!(h.escrow.balance_of(&alice), 10);
    assert_eq!(h.escrow.balance_of(&bob), 5);
    assert!(h.escrow.events().is_empty());
    h.assert_conserved();
}

#[test]
fn test_outcome_table_matches_events() {
    assert_eq!(
        rps_escrow_core::resolve(Move::Rock, Move::Paper),
        Outcome::PlayerTwoWins
    );
    assert!(rps_escrow_core::is_p1_winner(Move::Rock, Move::Scissors));
}
