use cellkit::{ContainerError, PtrArray};

#[test]
fn heap_pointers_round_trip() {
    let mut arr: PtrArray<Box<i32>> = PtrArray::new();
    for i in 0..1024 {
        arr.add(Box::new(i)).unwrap();
    }
    for i in 0..1024 {
        assert_eq!(**arr.get(i as usize).unwrap(), i);
    }
}

#[test]
fn raw_pointers_are_released_by_the_caller() {
    let mut arr: PtrArray<*mut u64> = PtrArray::with_capacity(4).unwrap();
    for i in 0..4 {
        arr.push(Box::into_raw(Box::new(i))).unwrap();
    }
    let mut freed = Vec::new();
    arr.destroy_with_items(|p| {
        // SAFETY: each pointer came from Box::into_raw above and is freed once.
        let b = unsafe { Box::from_raw(p) };
        freed.push(*b);
    });
    assert_eq!(freed, vec![0, 1, 2, 3]);
}

#[test]
fn remove_item_missing_is_reported() {
    let present = 1u8;
    let absent = 1u8;
    let mut arr: PtrArray<&u8> = PtrArray::new();
    arr.add(&present).unwrap();
    assert_eq!(arr.remove_item(&absent).unwrap_err(), ContainerError::ItemNotFound);
    assert_eq!(arr.index_of(&present), Some(0));
    assert!(arr.remove_item(&present).is_ok());
    assert!(arr.is_empty());
}

#[test]
fn reverse_then_pop_is_fifo() {
    let xs = ["a", "b", "c"];
    let mut arr: PtrArray<&&str> = PtrArray::new();
    for x in &xs {
        arr.push(x).unwrap();
    }
    arr.reverse();
    let order: Vec<&str> = std::iter::from_fn(|| arr.pop().map(|p| *p)).collect();
    assert_eq!(order, vec!["a", "b", "c"]);
}

#[test]
fn set_overwrites_slot_and_returns_old_handle() {
    let (a, b, c) = (1u32, 2u32, 3u32);
    let mut arr: PtrArray<&u32> = PtrArray::new();
    arr.push(&a).unwrap();
    arr.push(&b).unwrap();
    let old = arr.set(1, &c).unwrap();
    assert!(std::ptr::eq(old, &b));
    assert!(std::ptr::eq(*arr.get(1).unwrap(), &c));
    assert_eq!(
        arr.set(2, &a).unwrap_err(),
        ContainerError::IndexOutOfBounds { index: 2, len: 2 }
    );
    assert_eq!(arr.len(), 2);
}

#[test]
fn bulk_adds_copy_handles_in_order() {
    let xs = [10u8, 20, 30];
    let handles: Vec<&u8> = xs.iter().collect();
    let mut first: PtrArray<&u8> = PtrArray::new();
    first.addn(&handles).unwrap();
    let mut second: PtrArray<&u8> = PtrArray::new();
    second.push(&xs[2]).unwrap();
    second.add_array(&first).unwrap();
    let got: Vec<u8> = second.iter().map(|p| **p).collect();
    assert_eq!(got, vec![30, 10, 20, 30]);
    assert_eq!(first.len(), 3);
}

#[test]
fn slot_index_and_mutable_view() {
    let xs = [1i64, 2, 3, 4];
    let mut arr: PtrArray<*const i64> = PtrArray::new();
    for x in &xs {
        arr.push(x).unwrap();
    }
    let slot: *const *const i64 = &arr.as_slice()[2];
    assert_eq!(arr.get_index(slot), Some(2));
    assert_eq!(arr.get_index(std::ptr::null()), None);

    arr.as_mut_slice().swap(0, 3);
    *arr.get_mut(1).unwrap() = &xs[0] as *const i64;
    // SAFETY: every handle points into `xs`, which outlives `arr`.
    let got: Vec<i64> = arr.iter().map(|&p| unsafe { *p }).collect();
    assert_eq!(got, vec![4, 1, 3, 1]);
}
