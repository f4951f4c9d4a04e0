//! Basic usage example for typex.
//!
//! Demonstrates:
//! - Declaring a singleton and observing that its constructor runs once
//! - Declaring a multiton and looking up instances by name
//! - The default instance name
//! - Refusing an abstract base
//!
//! Run with: `cargo run --example basic_usage`

use std::sync::Arc;

use typex::{multiton, set_trace_callback, Multiton, Singleton, TypexError};

#[derive(Debug)]
struct AppConfig {
    name: String,
    debug_mode: bool,
}

impl Singleton for AppConfig {
    type Args = (&'static str, bool);

    fn construct((name, debug_mode): (&'static str, bool)) -> Self {
        println!("   [constructor] building AppConfig for {name}");
        AppConfig {
            name: name.to_string(),
            debug_mode,
        }
    }
}

#[derive(Debug)]
struct Worker {
    queue: String,
}

multiton!(Worker, |name| {
    println!("   [constructor] building Worker {name:?}");
    Worker {
        queue: format!("jobs.{name}"),
    }
});

struct PluginBase;

impl Singleton for PluginBase {
    type Args = ();
    const ABSTRACT: bool = true;

    fn construct(_: ()) -> Self {
        PluginBase
    }
}

fn main() {
    println!("=== typex: Basic Usage ===\n");

    set_trace_callback(|event| println!("   [trace] {event}"));

    // -------------------------------------------------------------------------
    // 1. Singleton: the first call constructs
    // -------------------------------------------------------------------------
    println!("1. First AppConfig lookup...");

    let config = AppConfig::instance(("MyApp", true)).unwrap();
    println!("   {:?}", config);

    // -------------------------------------------------------------------------
    // 2. Singleton: later calls reuse, ignoring arguments
    // -------------------------------------------------------------------------
    println!("\n2. Second AppConfig lookup with different arguments...");

    let again = AppConfig::instance(("OtherApp", false)).unwrap();
    println!("   same instance: {}", Arc::ptr_eq(&config, &again));
    println!("   name: {}, debug_mode: {}", again.name, again.debug_mode);

    // -------------------------------------------------------------------------
    // 3. Multiton: one instance per name
    // -------------------------------------------------------------------------
    println!("\n3. Worker lookups by name...");

    let a = Worker::named("a").unwrap();
    let b = Worker::named("b").unwrap();
    println!("   a: {} -> {}", a.instance_name(), a.queue);
    println!("   b: {} -> {}", b.instance_name(), b.queue);
    println!(
        "   Worker(\"a\") is Worker(\"a\"): {}",
        Arc::ptr_eq(&a, &Worker::named("a").unwrap())
    );

    // -------------------------------------------------------------------------
    // 4. Multiton: the default name
    // -------------------------------------------------------------------------
    println!("\n4. Worker without a name...");

    let unnamed = Worker::instance(()).unwrap();
    println!("   instance_name: {}", unnamed.instance_name());
    println!("   known workers: {:?}", Worker::instance_names());

    // -------------------------------------------------------------------------
    // 5. Abstract bases refuse construction
    // -------------------------------------------------------------------------
    println!("\n5. Constructing an abstract base...");

    match PluginBase::get_instance() {
        Ok(_) => println!("   unexpectedly constructed"),
        Err(e @ TypexError::InvalidUse { .. }) => println!("   Error (expected): {}", e),
        Err(e) => println!("   Error: {}", e),
    }

    println!("\n=== Example Complete ===");
}
