#![cfg(loom)]

use loom::thread;
use std::sync::Arc;

use carbon_mempool::{Pool, PoolOptions};

#[test]
fn concurrent_alloc_and_free_never_corrupts_the_handle_table() {
    loom::model(|| {
        let pool = Arc::new(Pool::with_options(PoolOptions::UNPOOLED).unwrap());

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let pool = pool.clone();
                thread::spawn(move || {
                    let ptr = pool.alloc(8).unwrap();
                    pool.free(ptr).unwrap();
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(pool.counters().num_alloc_calls, 2);
        assert_eq!(pool.counters().num_free_calls, 2);
    });
}
