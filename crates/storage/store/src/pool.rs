use page::PAGE_SIZE;
use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

/// A pool of reusable `PAGE_SIZE` scratch buffers, avoiding an allocation on
/// every `read`/`write`/`new`/`wipe`. Borrowers get scoped ownership via
/// [`PooledBuffer`]; the buffer returns to the pool on `Drop` regardless of
/// which exit path the borrower takes.
#[derive(Debug, Default)]
pub struct BufferPool {
    buffers: Mutex<Vec<Box<[u8; PAGE_SIZE]>>>,
}

impl BufferPool {
    pub fn new() -> Self {
        BufferPool {
            buffers: Mutex::new(Vec::new()),
        }
    }

    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buffer = self
            .buffers
            .lock()
            .expect("buffer pool mutex poisoned")
            .pop()
            .unwrap_or_else(|| Box::new([0u8; PAGE_SIZE]));
        PooledBuffer {
            pool: self,
            buffer: Some(buffer),
        }
    }

    fn release(&self, buffer: Box<[u8; PAGE_SIZE]>) {
        self.buffers
            .lock()
            .expect("buffer pool mutex poisoned")
            .push(buffer);
    }
}

/// A `PAGE_SIZE` buffer borrowed from a [`BufferPool`]. Returned to the pool
/// automatically when dropped; the next borrower receives it without any
/// reset beyond what the previous write already overwrote.
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buffer: Option<Box<[u8; PAGE_SIZE]>>,
}

impl Deref for PooledBuffer<'_> {
    type Target = [u8; PAGE_SIZE];
    fn deref(&self) -> &Self::Target {
        self.buffer.as_ref().expect("buffer taken before drop")
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.buffer.as_mut().expect("buffer taken before drop")
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.pool.release(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquired_buffer_is_page_sized_and_zeroed_when_fresh() {
        let pool = BufferPool::new();
        let buf = pool.acquire();
        assert_eq!(buf.len(), PAGE_SIZE);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn dropped_buffer_is_reused_by_the_next_acquire() {
        let pool = BufferPool::new();
        {
            let mut buf = pool.acquire();
            buf[0] = 0xAB;
        }
        let buf = pool.acquire();
        assert_eq!(buf[0], 0xAB);
    }
}
