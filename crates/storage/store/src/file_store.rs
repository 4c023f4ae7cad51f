use crate::api::PageStore;
use crate::config::StoreConfig;
use crate::errors::{StoreError, StoreResult};
use crate::pool::BufferPool;
use crate::stats::{Stats, StatsSnapshot};
use page::page_id::PageId;
use page::{Page, PAGE_SIZE};
use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

#[cfg(unix)]
use std::os::unix::fs::FileExt;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
#[cfg(windows)]
use std::os::windows::fs::FileExt;

/// A file-backed [`PageStore`]. Pages are stored as a flat concatenation of
/// `PAGE_SIZE` blocks; page `i` occupies bytes `[i * PAGE_SIZE, (i+1) *
/// PAGE_SIZE)` of the file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    file: File,
    read_only: bool,
    last_page_id: AtomicI64,
    count: AtomicI64,
    write_lock: Mutex<()>,
    buffers: BufferPool,
    stats: Stats,
}

impl FileStore {
    /// Opens (creating if necessary) the file named in `config`. Recovers
    /// `count`/`last_page_id` from the file's size; an empty file yields
    /// `count = 0, last_page_id = -1`.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut options = OpenOptions::new();
        options
            .read(true)
            .write(!config.read_only)
            .create(!config.read_only)
            .truncate(false);
        #[cfg(unix)]
        options.mode(config.mode);
        let file = options.open(&config.path)?;

        let size = file.metadata()?.len();
        let (count, last_page_id) = if size == 0 {
            (0i64, -1i64)
        } else {
            let count = (size / PAGE_SIZE as u64) as i64;
            (count, count - 1)
        };

        tracing::debug!(path = %config.path.display(), count, last_page_id, "opened file store");

        Ok(FileStore {
            path: config.path.clone(),
            file,
            read_only: config.read_only,
            last_page_id: AtomicI64::new(last_page_id),
            count: AtomicI64::new(count),
            write_lock: Mutex::new(()),
            buffers: BufferPool::new(),
            stats: Stats::default(),
        })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn check_bound(&self, id: PageId) -> StoreResult<()> {
        let last = PageId::new(self.last_page_id.load(Ordering::Acquire));
        if id.value() > last.value() {
            return Err(StoreError::InvalidPageId(id, last));
        }
        Ok(())
    }

    fn require_writable(&self) -> StoreResult<()> {
        if self.read_only {
            return Err(StoreError::ReadOnlyViolation);
        }
        Ok(())
    }

    #[inline]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> std::io::Result<usize> {
        #[cfg(unix)]
        {
            self.file.read_at(buf, offset)
        }
        #[cfg(windows)]
        {
            self.file.seek_read(buf, offset)
        }
    }

    #[inline]
    fn write_at(&self, buf: &[u8], offset: u64) -> std::io::Result<usize> {
        #[cfg(unix)]
        {
            self.file.write_at(buf, offset)
        }
        #[cfg(windows)]
        {
            self.file.seek_write(buf, offset)
        }
    }
}

impl PageStore for FileStore {
    fn read(&self, id: PageId) -> StoreResult<Page> {
        self.check_bound(id)?;
        let mut buf = self.buffers.acquire();
        let offset = id.byte_offset(PAGE_SIZE);
        let n = self.read_at(buf.as_mut(), offset)?;
        if n != PAGE_SIZE {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "short read of a page",
            )));
        }
        self.stats.record_read();
        Ok(Page::unmarshal(buf.as_ref()))
    }

    fn read_into(&self, id: PageId, page: &mut Page) -> StoreResult<()> {
        self.check_bound(id)?;
        let mut buf = self.buffers.acquire();
        let offset = id.byte_offset(PAGE_SIZE);
        let n = self.read_at(buf.as_mut(), offset)?;
        if n != PAGE_SIZE {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "short read of a page",
            )));
        }
        self.stats.record_read();
        page.unmarshal_into(buf.as_ref());
        Ok(())
    }

    fn write(&self, id: PageId, page: &Page) -> StoreResult<()> {
        self.require_writable()?;
        let _guard = self.write_lock.lock().expect("store write lock poisoned");
        self.check_bound(id)?;
        let bytes = page.marshal();
        let offset = id.byte_offset(PAGE_SIZE);
        self.write_at(&bytes, offset)?;
        self.stats.record_write();
        Ok(())
    }

    fn new_page(&self) -> StoreResult<PageId> {
        self.require_writable()?;
        let _guard = self.write_lock.lock().expect("store write lock poisoned");
        let mut buf = self.buffers.acquire();
        buf.iter_mut().for_each(|b| *b = 0);
        let next_id = self.last_page_id.load(Ordering::Acquire) + 1;
        let offset = next_id as u64 * PAGE_SIZE as u64;
        self.write_at(buf.as_ref(), offset)?;
        self.last_page_id.store(next_id, Ordering::Release);
        self.count.fetch_add(1, Ordering::AcqRel);
        self.stats.record_new();
        Ok(PageId::new(next_id))
    }

    fn append(&self, page: &Page) -> StoreResult<PageId> {
        self.require_writable()?;
        let _guard = self.write_lock.lock().expect("store write lock poisoned");
        let next_id = self.last_page_id.load(Ordering::Acquire) + 1;
        let offset = next_id as u64 * PAGE_SIZE as u64;
        self.write_at(&page.marshal(), offset)?;
        self.last_page_id.store(next_id, Ordering::Release);
        self.count.fetch_add(1, Ordering::AcqRel);
        self.stats.record_append();
        Ok(PageId::new(next_id))
    }

    fn wipe(&self, id: PageId) -> StoreResult<()> {
        self.require_writable()?;
        let _guard = self.write_lock.lock().expect("store write lock poisoned");
        self.check_bound(id)?;
        let mut buf = self.buffers.acquire();
        buf.iter_mut().for_each(|b| *b = 0);
        let offset = id.byte_offset(PAGE_SIZE);
        self.write_at(buf.as_ref(), offset)?;
        self.stats.record_wipe();
        Ok(())
    }

    fn count(&self) -> i64 {
        self.count.load(Ordering::Acquire)
    }

    fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    fn close(&self) -> StoreResult<()> {
        self.file.sync_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config() -> (tempfile::TempDir, StoreConfig) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heap.db");
        (dir, StoreConfig::new(path))
    }

    #[test]
    fn opening_a_fresh_path_yields_empty_store() {
        let (_dir, config) = temp_config();
        let store = FileStore::open(&config).unwrap();
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn new_page_then_read_roundtrips_a_heap_data_page() {
        let (_dir, config) = temp_config();
        let store = FileStore::open(&config).unwrap();
        let id = store.new_page().unwrap();
        let mut page = Page::new_heap_data();
        page.set_page_id(id);
        page.as_heap_data_mut().add_record(b"hello").unwrap();
        store.write(id, &page).unwrap();

        let reread = store.read(id).unwrap();
        assert_eq!(reread.as_heap_data().get_record(1).unwrap(), b"hello");
    }

    #[test]
    fn read_into_fills_an_existing_page_without_replacing_it() {
        let (_dir, config) = temp_config();
        let store = FileStore::open(&config).unwrap();
        let id = store.new_page().unwrap();
        let mut page = Page::new_heap_data();
        page.set_page_id(id);
        page.as_heap_data_mut().add_record(b"reused").unwrap();
        store.write(id, &page).unwrap();

        let mut target = Page::new_heap_data();
        target.as_heap_data_mut().add_record(b"stale").unwrap();
        store.read_into(id, &mut target).unwrap();
        assert_eq!(target.as_heap_data().get_record(1).unwrap(), b"reused");
    }

    #[test]
    fn read_beyond_last_page_is_invalid_page_id() {
        let (_dir, config) = temp_config();
        let store = FileStore::open(&config).unwrap();
        let err = store.read(PageId::new(5)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidPageId(_, _)));
    }

    #[test]
    fn reopen_recovers_count_and_last_page_id() {
        let (_dir, config) = temp_config();
        {
            let store = FileStore::open(&config).unwrap();
            for _ in 0..5 {
                store.new_page().unwrap();
            }
        }
        let reopened = FileStore::open(&config).unwrap();
        assert_eq!(reopened.count(), 5);
    }

    #[test]
    fn read_only_store_rejects_mutating_operations() {
        let (_dir, config) = temp_config();
        {
            let store = FileStore::open(&config).unwrap();
            store.new_page().unwrap();
        }
        let ro_config = StoreConfig {
            read_only: true,
            ..config
        };
        let store = FileStore::open(&ro_config).unwrap();
        let err = store.new_page().unwrap_err();
        assert!(matches!(err, StoreError::ReadOnlyViolation));
        // reads still work
        assert!(store.read(PageId::new(0)).is_ok());
    }

    #[test]
    fn wipe_zeroes_a_page_without_changing_count() {
        let (_dir, config) = temp_config();
        let store = FileStore::open(&config).unwrap();
        let id = store.new_page().unwrap();
        let before = store.count();
        store.wipe(id).unwrap();
        assert_eq!(store.count(), before);
    }
}
