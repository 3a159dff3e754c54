use std::collections::HashMap;
use std::rc::Rc;

use sky_core::{
    Condition, ConditionsStore, PcgRng, RandomSource, WeightedList, WeightedListError,
    arithmetic_cast,
};

fn tally<T: Clone + Eq + std::hash::Hash, W: sky_core::Weight>(
    list: &WeightedList<T, W>,
    rng: &mut impl RandomSource,
    draws: usize,
) -> HashMap<T, usize> {
    let mut counts = HashMap::new();
    for _ in 0..draws {
        let choice = list.get(rng).expect("list is not empty");
        *counts.entry(choice.clone()).or_insert(0) += 1;
    }
    counts
}

#[test]
fn draws_follow_the_weights() {
    let list: WeightedList<&str> = [(1, "rare"), (3, "common")].into_iter().collect();
    let counts = tally(&list, &mut PcgRng::new(0x5eed), 4000);

    let common = counts.get("common").copied().unwrap_or(0);
    assert!((2700..=3300).contains(&common), "common drawn {common} times");
    assert_eq!(counts.values().sum::<usize>(), 4000);
}

#[test]
fn same_seed_same_draws() {
    let list: WeightedList<u8> = (1..=8).map(|n| (u32::from(n), n)).collect();
    let mut a = PcgRng::new(77);
    let mut b = PcgRng::new(77);
    for _ in 0..100 {
        assert_eq!(list.get(&mut a), list.get(&mut b));
    }
}

#[test]
fn store_driven_spawn_table() {
    let store = Rc::new(ConditionsStore::new());
    store.set("pirate presence", 0);
    store.set("merchant traffic", 5);

    let mut spawns: WeightedList<&str, Condition<u32>> = WeightedList::new();
    spawns.push(Condition::bound("pirate presence", &store), "pirate raider");
    spawns.push(Condition::bound("merchant traffic", &store), "freighter");
    spawns.push(Condition::new(1), "derelict");
    assert_eq!(spawns.total_weight(), 6);

    let mut rng = PcgRng::new(9);
    let counts = tally(&spawns, &mut rng, 300);
    assert!(!counts.contains_key("pirate raider"));

    // The pirates move in; the list only notices after an update.
    store.set("pirate presence", 94);
    assert_eq!(spawns.total_weight(), 6);
    spawns.update_conditions(&*store);
    assert_eq!(spawns.total_weight(), 100);

    let counts = tally(&spawns, &mut rng, 1000);
    assert!(counts["pirate raider"] > counts.get("freighter").copied().unwrap_or(0));

    // Weighted mean of a projection follows the same weights.
    let bounty: f64 = spawns.average(|&name| if name == "pirate raider" { 100.0 } else { 0.0 });
    assert_eq!(bounty, 94.0);

    assert_eq!(spawns.erase_item(&"pirate raider"), 1);
    assert_eq!(spawns.total_weight(), 6);
}

#[test]
fn draining_a_list_ends_in_an_error() {
    let mut list: WeightedList<char> = "abc".chars().map(|c| (2, c)).collect();
    let mut rng = PcgRng::new(1);
    while !list.is_empty() {
        let drawn = *list.get(&mut rng).unwrap();
        list.erase_item(&drawn);
    }
    assert_eq!(list.get(&mut rng), Err(WeightedListError::Empty));
    assert_eq!(list.total_weight(), 0);
}

#[test]
fn conditions_share_one_store_across_types() {
    let store = Rc::new(ConditionsStore::new());
    let mut credits = Condition::<i64>::bound("credits", &store);
    credits.set(-1500);

    let as_unsigned = Condition::<u16>::bound("credits", &store);
    let as_float = Condition::<f32>::bound("credits", &store);
    assert_eq!(as_unsigned.value(), 0);
    assert_eq!(as_float.value(), -1500.0);
    assert!(as_float.is_truthy());
    assert_eq!(arithmetic_cast::<i8, _>(as_float.value()), i8::MIN);
}
