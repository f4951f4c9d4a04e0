//! Counter example for typex.
//!
//! Demonstrates:
//! - A plain counter shared by several threads
//! - A process-wide counter resolved independently at each call site
//! - Per-name counters that never affect one another
//!
//! Run with: `cargo run --example shared_counters`

use std::sync::Arc;
use std::thread;

use typex::{AbsoluteAtomic, Atomic, MultitonAtomic};

struct RequestIds;
struct Invoices;

fn handle_request() -> i64 {
    AbsoluteAtomic::<RequestIds>::shared().unwrap().next()
}

fn main() {
    println!("=== typex: Shared Counters ===\n");

    // -------------------------------------------------------------------------
    // 1. Plain counter
    // -------------------------------------------------------------------------
    println!("1. Four threads drawing from one Atomic...");

    let counter = Arc::new(Atomic::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let counter = Arc::clone(&counter);
            thread::spawn(move || (0..5).map(|_| counter.next()).collect::<Vec<_>>())
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        println!("   thread {i}: {:?}", handle.join().unwrap());
    }

    // -------------------------------------------------------------------------
    // 2. Process-wide counter
    // -------------------------------------------------------------------------
    println!("\n2. Request ids from independent call sites...");

    let ids: Vec<i64> = (0..5).map(|_| handle_request()).collect();
    println!("   ids: {:?}", ids);

    // -------------------------------------------------------------------------
    // 3. Per-name counters
    // -------------------------------------------------------------------------
    println!("\n3. Invoice numbers per region...");

    for region in ["eu", "us", "eu", "eu", "us"] {
        let numbers = MultitonAtomic::<Invoices>::named(region).unwrap();
        println!("   {}: #{}", numbers.instance_name(), numbers.next());
    }

    println!("\n=== Example Complete ===");
}
