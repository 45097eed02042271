//! End-to-end checks of the greedy policy against the environment.

use cut_policy::efficiency::efficiency;
use cut_policy::env::CuttingEnv;
use cut_policy::selector::{GreedyBestFit, Selector};
use cut_policy::stock::{FREE, Stock};
use cut_policy::types::{Decision, Observation, Position, ProductDemand, Rect};

fn product(w: u32, h: u32, quantity: u32) -> ProductDemand {
    ProductDemand::new(Rect::new(w, h), quantity)
}

/// A stock whose cells are occupied on a checkerboard of `block`-sized squares.
fn checkered(size: Rect, block: u32) -> Stock {
    let columns = (0..size.w)
        .map(|x| {
            (0..size.h)
                .map(|y| if (x / block + y / block) % 2 == 0 { FREE } else { 9 })
                .collect()
        })
        .collect();
    Stock::from_columns(columns).unwrap()
}

fn mixed_observation() -> Observation {
    Observation::new(
        vec![
            product(3, 2, 4),
            product(5, 1, 3),
            product(2, 2, 6),
            product(4, 4, 1),
            product(1, 3, 5),
            product(6, 6, 0),
        ],
        vec![
            Stock::new(Rect::new(7, 5)),
            checkered(Rect::new(9, 9), 3),
            Stock::padded(Rect::new(6, 4), Rect::new(9, 9)).unwrap(),
            Stock::new(Rect::new(10, 3)),
        ],
    )
}

fn assert_decision_valid(obs: &Observation, decision: &Decision) {
    let idx = decision.target().expect("expected a placement");
    let stock = &obs.stocks[idx];
    let usable = stock.size();
    assert!(
        decision.position.x + decision.size.w <= usable.w
            && decision.position.y + decision.size.h <= usable.h,
        "{decision} exceeds usable area {usable}"
    );
    assert!(
        stock.can_place(decision.position, decision.size),
        "{decision} overlaps occupied cells"
    );
    assert!(
        obs.products
            .iter()
            .any(|p| p.quantity > 0 && p.accepts(decision.size)),
        "{decision} matches no outstanding product"
    );
}

#[test]
fn test_every_decision_is_valid_until_exhaustion() {
    let mut env = CuttingEnv::from_observation(mixed_observation()).unwrap();
    let policy = GreedyBestFit::default();

    loop {
        let decision = policy.select(env.observation());
        if decision.is_none() {
            break;
        }
        assert_decision_valid(env.observation(), &decision);
        let outcome = env.step(decision).unwrap();
        if outcome.terminated {
            break;
        }
    }

    let info = env.info();
    assert!((0.0..=1.0).contains(&info.filled_ratio));
    assert!((0.0..=1.0).contains(&info.trim_loss));
}

#[test]
fn test_larger_area_attempted_first() {
    let obs = Observation::new(
        vec![product(1, 1, 3), product(2, 3, 1), product(2, 2, 2)],
        vec![Stock::new(Rect::new(8, 8))],
    );
    let mut env = CuttingEnv::from_observation(obs).unwrap();
    let episode = env.run(&GreedyBestFit::default(), 100);
    let areas: Vec<u64> = episode.decisions.iter().map(|d| d.size.area()).collect();
    assert_eq!(areas, vec![6, 4, 4, 1, 1, 1]);
    assert!(episode.terminated);
}

#[test]
fn test_repeated_selection_is_identical() {
    let obs = mixed_observation();
    let policy = GreedyBestFit::new(7);
    let first = policy.select(&obs);
    for _ in 0..5 {
        assert_eq!(policy.select(&obs), first);
    }
}

#[test]
fn test_full_stocks_give_sentinel() {
    let full = Stock::from_columns(vec![vec![0; 4]; 4]).unwrap();
    let obs = Observation::new(
        vec![product(1, 1, 2), product(2, 2, 1)],
        vec![full.clone(), full],
    );
    assert_eq!(
        GreedyBestFit::default().select(&obs),
        Decision {
            stock_idx: -1,
            size: Rect::new(0, 0),
            position: Position::new(0, 0),
        }
    );
}

#[test]
fn test_scenario_square_on_empty_stock() {
    let obs = Observation::new(vec![product(2, 2, 1)], vec![Stock::new(Rect::new(4, 4))]);
    let decision = GreedyBestFit::default().select(&obs);
    assert_eq!(decision.stock_idx, 0);
    assert_eq!(decision.size, Rect::new(2, 2));
    assert_eq!(decision.position, Position::new(2, 2));
}

#[test]
fn test_scenario_rotation_into_narrow_stock() {
    let obs = Observation::new(vec![product(3, 1, 1)], vec![Stock::new(Rect::new(1, 3))]);
    let decision = GreedyBestFit::default().select(&obs);
    assert_eq!(decision.size, Rect::new(1, 3));
}

#[test]
fn test_efficiency_bounds_over_episode() {
    let mut env = CuttingEnv::from_observation(mixed_observation()).unwrap();
    env.run(&GreedyBestFit::default(), 1_000);
    for stock in &env.observation().stocks {
        let score = efficiency(stock).unwrap();
        assert!((0.0..=1.0).contains(&score), "score {score} out of range");
    }
}

#[test]
fn test_selector_as_trait_object() {
    let policy: Box<dyn Selector> = Box::new(GreedyBestFit::default());
    let mut env = CuttingEnv::new(
        vec![product(2, 1, 3)],
        vec![Stock::new(Rect::new(2, 3))],
    )
    .unwrap();
    let episode = env.run(policy.as_ref(), 10);
    assert!(episode.terminated);
    assert_eq!(env.observation().stocks[0].free_cells(), 0);
}

#[test]
fn test_observation_json_round_trip_selects_same() {
    let obs = mixed_observation();
    let json = serde_json::to_string(&obs).unwrap();
    let parsed: Observation = serde_json::from_str(&json).unwrap();
    let policy = GreedyBestFit::default();
    assert_eq!(policy.select(&parsed), policy.select(&obs));
}
