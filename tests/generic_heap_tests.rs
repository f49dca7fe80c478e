//! Generic comprehensive tests for all Heap implementations
//!
//! These tests work with any engine through the traits and stress the shared
//! contract with edge cases and mixed operation sequences. Priorities only
//! ever grow after a pop, so the radix heap takes part as well.

mod common;

use meldheap::{
    AllocPool, DaryHeap, Heap, HeapError, LeftistHeap, MaxOrder, MeldableHeap, MinOrder,
    PairingHeap, RadixHeap, SequentialIds, SkewHeap, Tracked, TrackedHeap, TrackedLeftistHeap,
    TrackedPairingHeap, TrackedSkewHeap,
};

// Test helpers that work with any Heap implementation

/// Test that empty heap behaves correctly
fn test_empty_heap<H: Heap<String, u32>>(mut heap: H) {
    common::init_tracing();
    assert!(heap.is_empty());
    assert_eq!(heap.len(), 0);
    assert_eq!(heap.peek(), Err(HeapError::HeapEmpty));
    assert_eq!(heap.pop(), Err(HeapError::HeapEmpty));
    assert_eq!(heap.peek_value(), Err(HeapError::HeapEmpty));
    assert_eq!(heap.pop_priority(), Err(HeapError::HeapEmpty));
}

/// Test basic push and pop operations
fn test_basic_operations<H: Heap<&'static str, u32>>(mut heap: H) {
    heap.push("five", 5).unwrap();
    heap.push("one", 1).unwrap();
    heap.push("ten", 10).unwrap();
    heap.push("three", 3).unwrap();

    assert!(!heap.is_empty());
    assert_eq!(heap.len(), 4);
    assert_eq!(heap.peek(), Ok((&"one", &1)));

    assert_eq!(heap.pop(), Ok(("one", 1)));
    assert_eq!(heap.pop(), Ok(("three", 3)));
    assert_eq!(heap.pop(), Ok(("five", 5)));
    assert_eq!(heap.pop(), Ok(("ten", 10)));
    assert_eq!(heap.pop(), Err(HeapError::HeapEmpty));
    assert!(heap.is_empty());
}

/// Duplicate priorities must all come out, and nothing else in between
fn test_duplicate_priorities<H: Heap<u32, u32>>(mut heap: H) {
    for i in 0..10 {
        heap.push(i, 7).unwrap();
        heap.push(i, 3).unwrap();
    }
    let priorities: Vec<u32> = heap.into_sorted_vec().into_iter().map(|(_, p)| p).collect();
    let mut expected = vec![3; 10];
    expected.extend(vec![7; 10]);
    assert_eq!(priorities, expected);
}

/// Pops interleaved with pushes of larger priorities
fn test_interleaved<H: Heap<u32, u32>>(mut heap: H) {
    let mut next = 0u32;
    let mut popped = Vec::new();
    for round in 0..50u32 {
        for _ in 0..3 {
            next += 7;
            heap.push(next, next % 97 + round * 100).unwrap();
        }
        popped.push(heap.pop_priority().unwrap());
    }
    while let Ok(p) = heap.pop_priority() {
        popped.push(p);
    }
    assert_eq!(popped.len(), 150);
    assert!(popped.windows(2).all(|w| w[0] <= w[1]));
}

/// A cleared heap is empty and fully usable again
fn test_clear_and_reuse<H: Heap<u32, u32>>(mut heap: H) {
    for i in 0..100 {
        heap.push(i, i + 1000).unwrap();
    }
    heap.clear();
    assert!(heap.is_empty());
    assert_eq!(heap.pop(), Err(HeapError::HeapEmpty));

    for i in (0..100).rev() {
        heap.push(i, i + 2000).unwrap();
    }
    assert_eq!(heap.len(), 100);
    assert_eq!(heap.pop(), Ok((0, 2000)));
}

/// Merging keeps every element of both sides
fn test_merge<H: MeldableHeap<u32, u32>>(mut left: H, mut right: H) {
    for i in 0..20 {
        left.push(i, i * 2).unwrap();
        right.push(i, i * 2 + 1).unwrap();
    }
    left.merge(right).unwrap();
    assert_eq!(left.len(), 40);

    let moved = left.take();
    assert!(left.is_empty());
    let priorities: Vec<u32> = moved.into_sorted_vec().into_iter().map(|(_, p)| p).collect();
    assert_eq!(priorities, (0..40).collect::<Vec<_>>());
}

/// Update and remove through IDs
fn test_tracked_operations<H: TrackedHeap<i32, i32>>(mut heap: H) {
    let ids: Vec<H::Handle> = (0..10).map(|i| heap.push(i, i * 10).unwrap()).collect();

    // Decrease below the current top
    heap.update_priority(&ids[7], -1).unwrap();
    assert_eq!(heap.peek(), Ok((&7, &-1)));

    // Increase the top past everything else
    heap.update_priority(&ids[7], 1000).unwrap();
    assert_eq!(heap.peek(), Ok((&0, &0)));

    // Same priority is a no-op
    heap.update_priority(&ids[0], 0).unwrap();
    assert_eq!(heap.peek(), Ok((&0, &0)));

    heap.update(&ids[3], 33, 5).unwrap();
    assert_eq!(heap.get(&ids[3]), Ok((&33, &5)));

    assert_eq!(heap.remove(&ids[5]), Ok((5, 50)));
    assert_eq!(heap.remove(&ids[5]), Err(HeapError::NodeNotFound));
    assert_eq!(heap.update_priority(&ids[5], 1), Err(HeapError::NodeNotFound));
    assert!(!heap.contains(&ids[5]));

    assert_eq!(heap.pop(), Ok((0, 0)));
    assert!(!heap.contains(&ids[0]));
    assert_eq!(heap.get_value(&ids[0]), Err(HeapError::NodeNotFound));

    let values: Vec<i32> = heap.into_sorted_vec().into_iter().map(|(v, _)| v).collect();
    assert_eq!(values, vec![33, 1, 2, 4, 6, 8, 9, 7]);
}

/// Removing every element by ID in an arbitrary order empties the heap
fn test_remove_all<H: TrackedHeap<i32, i32>>(mut heap: H) {
    let mut live: Vec<Option<i32>> = (0..64).map(|i| Some((i * 37) % 64)).collect();
    let ids: Vec<H::Handle> = (0..64)
        .map(|i| heap.push(i, (i * 37) % 64).unwrap())
        .collect();

    // Deterministic shuffle
    let mut order: Vec<usize> = (0..64).collect();
    order.sort_by_key(|&i| (i * 13) % 64);
    for i in order {
        assert_eq!(heap.remove(&ids[i]), Ok((i as i32, (i as i32 * 37) % 64)));
        live[i] = None;
        let expected = live.iter().flatten().min();
        assert_eq!(heap.peek_priority().ok(), expected);
    }
    assert!(heap.is_empty());
}

macro_rules! heap_suite {
    ($name:ident, $make:expr) => {
        mod $name {
            use super::*;

            #[test]
            fn empty_heap() {
                test_empty_heap($make);
            }

            #[test]
            fn basic_operations() {
                test_basic_operations($make);
            }

            #[test]
            fn duplicate_priorities() {
                test_duplicate_priorities($make);
            }

            #[test]
            fn interleaved() {
                test_interleaved($make);
            }

            #[test]
            fn clear_and_reuse() {
                test_clear_and_reuse($make);
            }
        }
    };
}

heap_suite!(binary, DaryHeap::binary(MinOrder));
heap_suite!(ternary, DaryHeap::new(3, MinOrder));
heap_suite!(eight_ary, DaryHeap::new(8, MinOrder));
heap_suite!(pairing, PairingHeap::new(MinOrder));
heap_suite!(pairing_alloc, PairingHeap::with_pool(MinOrder, AllocPool));
heap_suite!(skew, SkewHeap::new(MinOrder));
heap_suite!(skew_alloc, SkewHeap::with_pool(MinOrder, AllocPool));
heap_suite!(leftist, LeftistHeap::new(MinOrder));
heap_suite!(leftist_alloc, LeftistHeap::with_pool(MinOrder, AllocPool));
heap_suite!(radix, RadixHeap::new());
heap_suite!(
    tracked_pairing,
    TrackedPairingHeap::<_, _, MinOrder, SequentialIds>::new(MinOrder)
);
heap_suite!(tracked_skew, TrackedSkewHeap::<_, _, MinOrder, SequentialIds>::new(MinOrder));
heap_suite!(
    tracked_leftist,
    TrackedLeftistHeap::<_, _, MinOrder, SequentialIds>::new(MinOrder)
);

#[test]
fn test_merge_all_meldable() {
    common::init_tracing();
    test_merge(PairingHeap::new(MinOrder), PairingHeap::new(MinOrder));
    test_merge(SkewHeap::new(MinOrder), SkewHeap::new(MinOrder));
    test_merge(LeftistHeap::new(MinOrder), LeftistHeap::new(MinOrder));
    test_merge(RadixHeap::new(), RadixHeap::new());
    test_merge(
        PairingHeap::with_pool(MinOrder, AllocPool),
        PairingHeap::with_pool(MinOrder, AllocPool),
    );
}

#[test]
fn test_tracked_all_engines() {
    common::init_tracing();
    test_tracked_operations(TrackedPairingHeap::<i32, i32, MinOrder, SequentialIds>::new(MinOrder));
    test_tracked_operations(TrackedSkewHeap::<i32, i32, MinOrder, SequentialIds>::new(MinOrder));
    test_tracked_operations(TrackedLeftistHeap::<i32, i32, MinOrder, SequentialIds>::new(MinOrder));
    test_tracked_operations(
        Tracked::<PairingHeap<i32, i32, MinOrder, u64, AllocPool>, SequentialIds>::with_pool(
            MinOrder, AllocPool,
        ),
    );
}

#[test]
fn test_remove_all_engines() {
    test_remove_all(TrackedPairingHeap::<i32, i32, MinOrder, SequentialIds>::new(MinOrder));
    test_remove_all(TrackedSkewHeap::<i32, i32, MinOrder, SequentialIds>::new(MinOrder));
    test_remove_all(TrackedLeftistHeap::<i32, i32, MinOrder, SequentialIds>::new(MinOrder));
}

#[test]
fn test_max_order_all_engines() {
    fn check<H: Heap<char, i32>>(mut heap: H) {
        for (v, p) in [('a', 3), ('b', 9), ('c', -4), ('d', 9), ('e', 0)] {
            heap.push(v, p).unwrap();
        }
        let priorities: Vec<i32> = heap.into_sorted_vec().into_iter().map(|(_, p)| p).collect();
        assert_eq!(priorities, vec![9, 9, 3, 0, -4]);
    }
    check(DaryHeap::new(4, MaxOrder));
    check(PairingHeap::new(MaxOrder));
    check(SkewHeap::new(MaxOrder));
    check(LeftistHeap::new(MaxOrder));
    check(TrackedPairingHeap::<char, i32, MaxOrder, SequentialIds>::new(MaxOrder));
}

#[test]
fn test_closure_comparator() {
    // Order by distance from 50, ties broken toward the smaller priority
    let by_distance = |a: &i32, b: &i32| ((a - 50).abs(), *a) < ((b - 50).abs(), *b);
    let mut heap = PairingHeap::new(by_distance);
    for p in [10, 49, 90, 51, 50] {
        heap.push((), p).unwrap();
    }
    let priorities: Vec<i32> = heap.into_sorted_vec().into_iter().map(|(_, p)| p).collect();
    assert_eq!(priorities, vec![50, 49, 51, 10, 90]);
}
