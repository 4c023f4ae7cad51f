//! Facade over the storage engine: a durable, paged heap of variable-length
//! byte records addressed by a stable record id.
//!
//! ```no_run
//! use recordheap::{Heap, HeapScanner};
//! use store::{FileStore, StoreConfig};
//!
//! let store = FileStore::open(&StoreConfig::new("heap.db")).unwrap();
//! let heap = Heap::open(store).unwrap();
//! let rid = heap.put(b"hello").unwrap();
//! assert_eq!(heap.get(rid).unwrap(), b"hello");
//!
//! let scanner = HeapScanner::new(&heap);
//! for (rid, bytes) in std::iter::from_fn(|| scanner.next_record()) {
//!     println!("{rid}: {} bytes", bytes.len());
//! }
//! ```

pub use heap::{Heap, HeapError, HeapResult, HeapScanner, Rid};
pub use page::{Page, PageId, PageType};
pub use store::{FileStore, MemoryStore, PageStore, StoreConfig, StoreError, StoreResult};
