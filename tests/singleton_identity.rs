//! Integration tests for singleton identity and once-only construction.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use typex::{singleton, Singleton, TypexError};

#[test]
fn test_constructor_runs_once_across_calls() {
    static BUILT: AtomicUsize = AtomicUsize::new(0);

    struct Database {
        url: String,
    }

    impl Singleton for Database {
        type Args = String;

        fn construct(url: String) -> Self {
            BUILT.fetch_add(1, Ordering::SeqCst);
            Database { url }
        }
    }

    let first = Database::instance("postgres://primary".to_string()).unwrap();
    for i in 0..10 {
        let again = Database::instance(format!("postgres://replica-{i}")).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
    }

    assert_eq!(first.url, "postgres://primary");
    assert_eq!(BUILT.load(Ordering::SeqCst), 1);
}

#[test]
fn test_racing_first_construction_yields_one_instance() {
    const THREADS: usize = 12;
    static BUILT: AtomicUsize = AtomicUsize::new(0);

    struct Pool {
        built_by: usize,
    }

    impl Singleton for Pool {
        type Args = usize;

        fn construct(thread_index: usize) -> Self {
            BUILT.fetch_add(1, Ordering::SeqCst);
            thread::yield_now();
            Pool {
                built_by: thread_index,
            }
        }
    }

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                Pool::instance(i).unwrap()
            })
        })
        .collect();

    let pools: Vec<Arc<Pool>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(BUILT.load(Ordering::SeqCst), 1);
    assert!(pools.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert!(pools[0].built_by < THREADS);
}

#[test]
fn test_constructor_panic_allows_retry() {
    static ATTEMPTS: AtomicUsize = AtomicUsize::new(0);

    struct Flaky {
        attempt: usize,
    }

    impl Singleton for Flaky {
        type Args = ();

        fn construct(_: ()) -> Self {
            let attempt = ATTEMPTS.fetch_add(1, Ordering::SeqCst);
            if attempt == 0 {
                panic!("first attempt fails");
            }
            Flaky { attempt }
        }
    }

    let failed = std::panic::catch_unwind(|| Flaky::get_instance());
    assert!(failed.is_err());
    assert!(!Flaky::is_initialized());

    let flaky = Flaky::get_instance().unwrap();
    assert_eq!(flaky.attempt, 1);
    assert!(Flaky::is_initialized());
}

#[test]
fn test_abstract_base_never_constructs() {
    static BUILT: AtomicUsize = AtomicUsize::new(0);

    struct Base;
    singleton!(abstract Base, || {
        BUILT.fetch_add(1, Ordering::SeqCst);
        Base
    });

    for _ in 0..3 {
        match Base::get_instance() {
            Err(TypexError::InvalidUse { type_name, reason }) => {
                assert!(type_name.ends_with("Base"));
                assert_eq!(reason, "abstract pattern bases cannot be instantiated");
            }
            _ => panic!("abstract base was instantiated"),
        }
    }
    assert_eq!(BUILT.load(Ordering::SeqCst), 0);
}

#[test]
fn test_generic_types_are_distinct_singletons() {
    struct Cache<K: 'static> {
        capacity: usize,
        _key: std::marker::PhantomData<fn() -> K>,
    }

    impl<K: 'static> Singleton for Cache<K> {
        type Args = usize;

        fn construct(capacity: usize) -> Self {
            Cache {
                capacity,
                _key: std::marker::PhantomData,
            }
        }
    }

    let by_id = Cache::<u64>::instance(16).unwrap();
    let by_name = Cache::<String>::instance(256).unwrap();

    assert_eq!(by_id.capacity, 16);
    assert_eq!(by_name.capacity, 256);
    assert_eq!(Cache::<u64>::instance(1).unwrap().capacity, 16);
}

#[test]
fn test_singleton_may_hold_other_singletons() {
    struct Logger(&'static str);
    struct App {
        logger: Arc<Logger>,
    }

    singleton!(Logger, || Logger("stderr"));

    impl Singleton for App {
        type Args = ();

        fn construct(_: ()) -> Self {
            App {
                // Another type's singleton can be resolved during construction.
                logger: Logger::get_instance().unwrap(),
            }
        }
    }

    let app = App::get_instance().unwrap();
    assert_eq!(app.logger.0, "stderr");
    assert!(Arc::ptr_eq(&app.logger, &Logger::get_instance().unwrap()));
}

#[test]
fn test_cross_thread_dependency_cycle_is_rejected() {
    use std::sync::LazyLock;

    // Both constructors are running before either asks for the other type.
    static BOTH_STARTED: LazyLock<Barrier> = LazyLock::new(|| Barrier::new(2));

    struct Ping {
        peer_rejected: bool,
    }
    struct Pong {
        peer_rejected: bool,
    }

    impl Singleton for Ping {
        type Args = ();

        fn construct(_: ()) -> Self {
            BOTH_STARTED.wait();
            let peer = Pong::get_instance();
            Ping {
                peer_rejected: matches!(peer, Err(TypexError::RecursiveConstruction { .. })),
            }
        }
    }

    impl Singleton for Pong {
        type Args = ();

        fn construct(_: ()) -> Self {
            BOTH_STARTED.wait();
            let peer = Ping::get_instance();
            Pong {
                peer_rejected: matches!(peer, Err(TypexError::RecursiveConstruction { .. })),
            }
        }
    }

    let ping = thread::spawn(|| Ping::get_instance().unwrap());
    let pong = thread::spawn(|| Pong::get_instance().unwrap());
    let (ping, pong) = (ping.join().unwrap(), pong.join().unwrap());

    // Exactly one side was refused; the other received the finished peer.
    assert!(ping.peer_rejected ^ pong.peer_rejected);
    assert!(Ping::is_initialized());
    assert!(Pong::is_initialized());
}
