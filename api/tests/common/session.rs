//! Process-wide test state: the shared store, the shared application object
//! and the lock that runs store-backed tests one at a time.

use std::sync::{Arc, OnceLock};
use taskboard_api::Dependencies;
use taskboard_db::tst::TestStore;
use tokio::sync::{Mutex, OnceCell};

static STORE: OnceCell<TestStore> = OnceCell::const_new();

static APP: OnceLock<Arc<Dependencies>> = OnceLock::new();

pub(crate) static SERIAL: Mutex<()> = Mutex::const_new(());

/// The store shared by every test in this binary, created on first use.
pub async fn session_store() -> &'static TestStore {
    STORE
        .get_or_init(|| {
            async {
                TestStore::acquire()
                    .await
                    .expect("failed to acquire test store")
            }
        })
        .await
}

/// The application object shared by every test in this binary. It has no
/// database of its own, so requests only succeed while a test has its
/// override installed.
pub fn session_app() -> Arc<Dependencies> {
    APP.get_or_init(|| Arc::new(Dependencies::unconfigured()))
        .clone()
}

#[ctor::dtor]
fn release_session_store() {
    if let Some(store) = STORE.get() {
        store.release_blocking();
    }
}
