//! Extreme stress tests that really push the heaps to their limits
//!
//! These tests perform large numbers of operations in various patterns
//! to catch edge cases and verify correctness under load.

mod common;

use meldheap::{
    AllocPool, DaryHeap, Heap, HeapError, IndexedHeap, LeftistHeap, MeldableHeap, MinOrder,
    PairingHeap, RadixHeap, SequentialIds, SkewHeap, TrackedHeap, TrackedLeftistHeap, TrackedPairingHeap,
    TrackedSkewHeap,
};

/// Test massive numbers of pushes and pops
fn test_massive_operations<H: Heap<i32, i32>>(mut heap: H) {
    for i in 0..10_000 {
        heap.push(i, i).unwrap();
    }
    assert_eq!(heap.len(), 10_000);

    for i in 0..10_000 {
        assert_eq!(heap.pop(), Ok((i, i)));
    }
    assert!(heap.is_empty());
}

/// Descending input is the worst case for several meld rules
fn test_descending_operations<H: Heap<i32, i32>>(mut heap: H) {
    for i in (0..10_000).rev() {
        heap.push(i, i).unwrap();
    }
    for i in 0..10_000 {
        assert_eq!(heap.pop_priority(), Ok(i));
    }
}

/// Test many decrease-key operations
fn test_many_decrease_keys<H: TrackedHeap<i32, i32>>(mut heap: H) {
    let ids: Vec<H::Handle> = (0..2_000).map(|i| heap.push(i, 10_000 + i).unwrap()).collect();

    for (i, id) in ids.iter().enumerate() {
        heap.update_priority(id, i as i32).unwrap();
    }

    for i in 0..2_000 {
        assert_eq!(heap.pop(), Ok((i, i)));
    }
}

/// Every element raised, lowered, and finally removed from the middle
fn test_churn<H: TrackedHeap<i32, i32>>(mut heap: H) {
    let ids: Vec<H::Handle> = (0..3_000).map(|i| heap.push(i, (i * 7919) % 3_001).unwrap()).collect();

    for (i, id) in ids.iter().enumerate() {
        let i = i as i32;
        heap.update_priority(id, 5_000 + i).unwrap();
        if i % 3 == 0 {
            heap.update_priority(id, -i).unwrap();
        }
    }
    for id in ids.iter().skip(1).step_by(2) {
        heap.remove(id).unwrap();
    }

    let mut last = i32::MIN;
    let mut count = 0;
    while let Ok(p) = heap.pop_priority() {
        assert!(p >= last);
        last = p;
        count += 1;
    }
    assert_eq!(count, 1_500);
}

/// Alternating push and pop keeps the heap small but busy
fn test_alternating_ops<H: Heap<i32, i32>>(mut heap: H) {
    for i in 0..5_000 {
        heap.push(i, i * 2).unwrap();
        heap.push(i, i * 2 + 1).unwrap();
        assert_eq!(heap.pop_priority(), Ok(i));
    }
    assert_eq!(heap.len(), 5_000);
}

/// Merge many small heaps into one
fn test_large_merge<H: MeldableHeap<i32, i32>>(make: impl Fn() -> H) {
    let mut acc = make();
    for chunk in 0..100 {
        let mut part = make();
        for i in 0..100 {
            part.push(i, i * 100 + chunk).unwrap();
        }
        acc.merge(part).unwrap();
    }
    assert_eq!(acc.len(), 10_000);
    for p in 0..10_000 {
        assert_eq!(acc.pop_priority(), Ok(p));
    }
}

#[test]
fn test_dary_massive() {
    common::init_tracing();
    for arity in [2, 3, 4, 8, 16] {
        test_massive_operations(DaryHeap::new(arity, MinOrder));
        test_descending_operations(DaryHeap::new(arity, MinOrder));
        test_alternating_ops(DaryHeap::new(arity, MinOrder));
    }
}

#[test]
fn test_pairing_massive() {
    test_massive_operations(PairingHeap::new(MinOrder));
    test_descending_operations(PairingHeap::new(MinOrder));
    test_alternating_ops(PairingHeap::new(MinOrder));
    test_large_merge(|| PairingHeap::new(MinOrder));
}

#[test]
fn test_skew_massive() {
    test_massive_operations(SkewHeap::new(MinOrder));
    test_descending_operations(SkewHeap::new(MinOrder));
    test_alternating_ops(SkewHeap::new(MinOrder));
    test_large_merge(|| SkewHeap::new(MinOrder));
}

#[test]
fn test_leftist_massive() {
    test_massive_operations(LeftistHeap::new(MinOrder));
    test_descending_operations(LeftistHeap::new(MinOrder));
    test_alternating_ops(LeftistHeap::new(MinOrder));
    test_large_merge(|| LeftistHeap::new(MinOrder));
}

#[test]
fn test_allocate_policy_massive() {
    test_massive_operations(PairingHeap::with_pool(MinOrder, AllocPool));
    test_massive_operations(SkewHeap::with_pool(MinOrder, AllocPool));
    test_massive_operations(LeftistHeap::with_pool(MinOrder, AllocPool));
}

#[test]
fn test_tracked_many_decrease_keys() {
    test_many_decrease_keys(TrackedPairingHeap::<i32, i32, MinOrder, SequentialIds>::new(MinOrder));
    test_many_decrease_keys(TrackedSkewHeap::<i32, i32, MinOrder, SequentialIds>::new(MinOrder));
    test_many_decrease_keys(TrackedLeftistHeap::<i32, i32, MinOrder, SequentialIds>::new(MinOrder));
}

#[test]
fn test_tracked_churn() {
    test_churn(TrackedPairingHeap::<i32, i32, MinOrder, SequentialIds>::new(MinOrder));
    test_churn(TrackedSkewHeap::<i32, i32, MinOrder, SequentialIds>::new(MinOrder));
    test_churn(TrackedLeftistHeap::<i32, i32, MinOrder, SequentialIds>::new(MinOrder));
}

#[test]
fn test_radix_large_range() {
    let mut heap: RadixHeap<u64, u64> = RadixHeap::new();
    let mut next = 1u64;
    for _ in 0..10_000 {
        // Spread priorities over the whole 64-bit range
        next = next.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        heap.push(next, next).unwrap();
    }
    let mut last = 0;
    while let Ok(p) = heap.pop_priority() {
        assert!(p >= last);
        last = p;
    }
}

#[test]
fn test_radix_dijkstra_pattern() {
    // Pop one, push a few at or above it, like relaxing outgoing edges
    let mut heap: RadixHeap<u32, u32> = RadixHeap::new();
    heap.push(0, 0).unwrap();
    let mut popped = 0;
    while let Ok((node, dist)) = heap.pop() {
        popped += 1;
        if node < 5_000 {
            for w in [1, 3, 7] {
                heap.push(node * 3 + w, dist + w).unwrap();
            }
        }
        if dist > 0 {
            assert_eq!(heap.push(0, dist - 1), Err(HeapError::PriorityBelowBaseline));
        }
    }
    assert_eq!(popped, 9_868);
}

#[test]
fn test_dary_index_churn() {
    let mut heap = DaryHeap::from_entries(4, MinOrder, (0..5_000).map(|i| (i, (i * 31) % 5_000)));
    for round in 0..2_000i32 {
        let i = (round as usize * 17) % heap.len();
        if round % 2 == 0 {
            heap.update(i, round, round * 3).unwrap();
        } else {
            heap.remove(i).unwrap();
        }
    }
    let mut last = i32::MIN;
    while let Ok(p) = heap.pop_priority() {
        assert!(p >= last);
        last = p;
    }
}
