use cellkit::Dict;

#[test]
fn integer_keys_map_to_identical_strings() {
    let mut d: Dict<String> = Dict::new().unwrap();
    for i in 0..128 {
        let key = i.to_string();
        assert!(d.set(&key, key.clone()).unwrap().is_none());
    }
    assert_eq!(d.len(), 128);
    for ix in 0..128 {
        let key = d.get_key_at(ix).expect("dense position below len");
        let value = d.get(key).expect("key resolves");
        assert_eq!(key, value.as_str());
        assert_eq!(d.get_value_at(ix), Some(value));
    }
    assert!(d.get_key_at(128).is_none());
    assert!(d.get_value_at(128).is_none());
}

#[test]
fn last_set_wins_and_count_tracks_distinct_keys() {
    let mut d = Dict::new().unwrap();
    for round in 0..3 {
        for i in 0..50 {
            d.set(&format!("k{}", i), i * 10 + round).unwrap();
        }
    }
    assert_eq!(d.len(), 50);
    for i in 0..50 {
        assert_eq!(d.get(&format!("k{}", i)), Some(&(i * 10 + 2)));
    }
}

#[test]
fn missing_keys_report_not_found() {
    let mut d = Dict::new().unwrap();
    d.set("present", 1).unwrap();
    assert!(d.get("absent").is_none());
    assert!(!d.contains_key("absent"));
    assert!(d.remove("absent").is_none());
    assert_eq!(d.len(), 1);
}

#[test]
fn interior_removal_keeps_every_other_key_reachable() {
    let mut d = Dict::new().unwrap();
    for i in 0..128 {
        d.set(&i.to_string(), i).unwrap();
    }
    for victim in [0, 1, 63, 64, 100, 127] {
        let before = d.len();
        assert_eq!(d.remove(&victim.to_string()), Some(victim));
        assert_eq!(d.len(), before - 1);
        assert!(d.get(&victim.to_string()).is_none());
    }
    for i in 0..128 {
        let expect_present = ![0, 1, 63, 64, 100, 127].contains(&i);
        assert_eq!(d.get(&i.to_string()).is_some(), expect_present, "key {}", i);
    }
    let mut seen: Vec<&str> = d.iter().map(|(k, _)| k).collect();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), d.len());
}

#[test]
fn clear_then_reuse() {
    let mut d = Dict::new().unwrap();
    for i in 0..40 {
        d.set(&i.to_string(), i).unwrap();
    }
    let capacity = d.capacity();
    d.clear();
    assert!(d.is_empty());
    assert_eq!(d.capacity(), capacity);
    assert!(d.get("3").is_none());
    d.set("3", 33).unwrap();
    assert_eq!(d.get("3"), Some(&33));
    assert_eq!(d.len(), 1);
}

#[test]
fn values_may_be_borrowed() {
    let names = ["alpha".to_string(), "beta".to_string()];
    let mut d: Dict<&String> = Dict::new().unwrap();
    d.set("a", &names[0]).unwrap();
    d.set("b", &names[1]).unwrap();
    d.remove("a");
    drop(d);
    // Values were never owned by the dict.
    assert_eq!(names[0], "alpha");
}

#[test]
fn with_capacity_avoids_early_growth() {
    let mut d = Dict::with_capacity(256).unwrap();
    let capacity = d.capacity();
    assert_eq!(capacity, 179);
    for i in 0..capacity {
        d.set(&i.to_string(), i).unwrap();
    }
    assert_eq!(d.capacity(), capacity);
    d.set("one more", 0).unwrap();
    assert!(d.capacity() > capacity);
}

#[test]
fn debug_formats_as_map() {
    let mut d = Dict::new().unwrap();
    d.set("k", 1).unwrap();
    assert_eq!(format!("{:?}", d), r#"{"k": 1}"#);
}
