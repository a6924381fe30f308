use cellkit::PtrDict;

#[test]
fn heap_keys_map_to_their_decimal_strings() {
    let keys: Vec<Box<i32>> = (0..128).map(Box::new).collect();
    let mut d: PtrDict<&i32, String> = PtrDict::new().unwrap();
    for k in &keys {
        d.set(&**k, k.to_string()).unwrap();
    }
    assert_eq!(d.len(), 128);
    for ix in 0..d.len() {
        let key = *d.get_key_at(ix).unwrap();
        let value = d.get(key).unwrap();
        assert_eq!(*key, value.parse::<i32>().unwrap());
    }
}

#[test]
fn set_then_get_by_identity() {
    let x = 1u16;
    let y = 1u16;
    let mut d: PtrDict<*const u16, &str> = PtrDict::new().unwrap();
    d.set(&x, "x").unwrap();
    assert_eq!(d.get(&x), Some(&"x"));
    assert_eq!(d.get(&y), None);
    d.set(&y, "y").unwrap();
    assert_eq!(d.get(&x), Some(&"x"));
    assert_eq!(d.get(&y), Some(&"y"));
}

#[test]
fn removal_under_collisions_keeps_survivors() {
    // Same low four address bits for every key.
    let slots = [[0u8; 16]; 40];
    let mut d: PtrDict<&[u8; 16], usize> = PtrDict::new().unwrap();
    for (ix, slot) in slots.iter().enumerate() {
        d.set(slot, ix).unwrap();
    }
    for ix in (0..40).step_by(4) {
        let (key, value) = d.remove(&slots[ix]).unwrap();
        assert!(core::ptr::eq(key, &slots[ix]));
        assert_eq!(value, ix);
    }
    for (ix, slot) in slots.iter().enumerate() {
        let expected = if ix % 4 == 0 { None } else { Some(&ix) };
        assert_eq!(d.get(slot), expected);
    }
    assert_eq!(d.len(), 30);
}

#[test]
fn owning_keys_are_returned_on_remove() {
    let mut d: PtrDict<Box<String>, u32> = PtrDict::new().unwrap();
    let key = Box::new("owned".to_string());
    let addr: *const String = &*key;
    d.set(key, 1).unwrap();
    let (back, value) = d.remove(addr).unwrap();
    assert_eq!(*back, "owned");
    assert_eq!(value, 1);
    assert!(d.is_empty());
}

#[test]
fn get_mut_and_iter() {
    let a = 0u8;
    let b = 0u8;
    let mut d: PtrDict<&u8, i64> = PtrDict::new().unwrap();
    d.set(&a, 1).unwrap();
    d.set(&b, 2).unwrap();
    *d.get_mut(&a).unwrap() += 5;
    for (_, v) in d.iter_mut() {
        *v *= -1;
    }
    let total: i64 = d.iter().map(|(_, v)| *v).sum();
    assert_eq!(total, -8);
    assert!(d.contains_key(&a));
    d.clear();
    assert!(!d.contains_key(&a));
}
