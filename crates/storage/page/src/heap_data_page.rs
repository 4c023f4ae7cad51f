//! The slotted heap data page: the hard part of this crate.
//!
//! Records grow from the low end of the body upward; the slot directory
//! grows from the high end downward. Slot 0 never holds a record — it is
//! the freespace descriptor, its `offset`/`length` describing the unused
//! gap between the record zone and the directory.

use crate::errors::heap_page_error::HeapPageError;
use crate::header::{impl_header_accessors, HeaderMut, HeaderRef, HEADER_SIZE};
use crate::page_id::PageId;
use crate::page_type::PageType;
use crate::slot::{SlotFlags, DELETED_SENTINEL, SLOT_SIZE};
use crate::slot_array::{SlotArrayMut, SlotArrayRef};
use crate::PAGE_SIZE;
use binary_helpers::conversions::UsizeConversion;

/// Length of the slot region: everything after the header.
pub const BODY_LEN: usize = PAGE_SIZE - HEADER_SIZE;

/// Largest record that can ever fit on a page: the body minus the two
/// slot entries (freespace slot + the record's own slot) that must always
/// coexist with it.
pub const MAX_RECORD_LEN: usize = BODY_LEN - 2 * SLOT_SIZE;

const SLOT_COUNT_OFFSET: usize = 9;

/// Slot index of the reserved freespace descriptor.
const FREESPACE_SLOT: u32 = 0;

impl_header_accessors! {
    slot_count: u16 = SLOT_COUNT_OFFSET;
}

/// A heap data page: the header plus its 8136-byte slot region, owned as a
/// single contiguous buffer so marshal/unmarshal is a straight byte copy.
#[derive(Debug, Clone)]
pub struct HeapDataPage {
    bytes: Box<[u8; PAGE_SIZE]>,
}

impl HeapDataPage {
    /// Creates a fresh, empty heap data page: slot count 1, slot 0 spans
    /// the whole body.
    pub fn new() -> Self {
        let mut page = HeapDataPage {
            bytes: Box::new([0u8; PAGE_SIZE]),
        };
        page.header_mut()
            .set_page_type(PageType::HeapData)
            .expect("header write into fixed-size buffer cannot fail");
        page.reset_to_empty();
        page
    }

    fn reset_to_empty(&mut self) {
        self.header_mut()
            .set_slot_count(1)
            .expect("header write cannot fail");
        let mut slots = self.slot_array_mut(1);
        slots
            .slot_mut(FREESPACE_SLOT)
            .expect("slot 0 always exists")
            .set_flags(SlotFlags::ON_PAGE);
        slots
            .set_slot(FREESPACE_SLOT, 0, (BODY_LEN - 2 * SLOT_SIZE) as u16)
            .expect("slot 0 always exists");
    }

    pub fn page_id(&self) -> PageId {
        self.header_ref()
            .page_id()
            .expect("header read from fixed-size buffer cannot fail")
    }

    pub fn set_page_id(&mut self, id: PageId) {
        self.header_mut()
            .set_page_id(id)
            .expect("header write cannot fail");
    }

    /// Number of slots, including the reserved freespace slot.
    pub fn get_slot_count(&self) -> u16 {
        self.header_ref()
            .slot_count()
            .expect("header read cannot fail")
    }

    /// Bytes currently free for a new record (the freespace slot's length).
    pub fn get_free_space(&self) -> usize {
        let count = self.get_slot_count();
        self.slot_array_ref(count)
            .slot_ref(FREESPACE_SLOT)
            .expect("slot 0 always exists")
            .length()
            .expect("slot read cannot fail") as usize
    }

    /// Inserts `record`, returning the slot index it was assigned.
    pub fn add_record(&mut self, record: &[u8]) -> Result<u16, HeapPageError> {
        let free = self.get_free_space();
        if record.len() > free {
            return Err(HeapPageError::InsufficientPageSpace {
                needed: record.len(),
                available: free,
            });
        }

        let slot_count = self.get_slot_count();
        let new_slot = slot_count;
        let record_offset = {
            let slots = self.slot_array_ref(slot_count);
            slots.slot_ref(FREESPACE_SLOT)?.offset()?
        };
        let record_len = record.len().to_u16().map_err(|_| {
            HeapPageError::RecordExceedsMaxSize {
                len: record.len(),
                max: MAX_RECORD_LEN,
            }
        })?;

        self.header_mut().set_slot_count(slot_count + 1)?;
        {
            let mut slots = self.slot_array_mut(slot_count + 1);
            let mut slot = slots.slot_mut(new_slot.into())?;
            slot.set_flags(SlotFlags::ON_PAGE);
            slot.set_offset(record_offset)?;
            slot.set_length(record_len)?;
        }

        let start = HEADER_SIZE + record_offset as usize;
        self.bytes[start..start + record.len()].copy_from_slice(record);

        let new_free_start = record_offset + record_len;
        self.update_freespace_slot(new_free_start, slot_count + 1)?;

        Ok(new_slot)
    }

    /// Recomputes and writes slot 0's `(offset, length)` from the given
    /// freespace start and slot count, clamping length at 0.
    fn update_freespace_slot(&mut self, freespace_start: u16, slot_count: u16) -> Result<(), HeapPageError> {
        let directory_bytes = (slot_count as usize + 1) * SLOT_SIZE;
        let length = (BODY_LEN as isize - freespace_start as isize - directory_bytes as isize).max(0) as u16;
        let mut slots = self.slot_array_mut(slot_count);
        slots.set_slot(FREESPACE_SLOT, freespace_start, length)?;
        Ok(())
    }

    fn check_record_slot(&self, slot: u16) -> Result<(), HeapPageError> {
        let slot_count = self.get_slot_count();
        if slot == 0 || slot >= slot_count {
            return Err(HeapPageError::InvalidRid { slot: slot as i16 });
        }
        Ok(())
    }

    pub fn get_record_length(&self, slot: u16) -> Result<usize, HeapPageError> {
        self.check_record_slot(slot)?;
        let slot_count = self.get_slot_count();
        let view = self.slot_array_ref(slot_count).slot_ref(slot as u32)?;
        if view.flags().is_deleted() {
            return Err(HeapPageError::RecordDeleted { slot: slot as i16 });
        }
        Ok(view.length()? as usize)
    }

    /// Returns a zero-copy view of the record's bytes.
    pub fn get_record(&self, slot: u16) -> Result<&[u8], HeapPageError> {
        self.check_record_slot(slot)?;
        let slot_count = self.get_slot_count();
        let (offset, length) = {
            let view = self.slot_array_ref(slot_count).slot_ref(slot as u32)?;
            if view.flags().is_deleted() {
                return Err(HeapPageError::RecordDeleted { slot: slot as i16 });
            }
            (view.offset()? as usize, view.length()? as usize)
        };
        let start = HEADER_SIZE + offset;
        Ok(&self.bytes[start..start + length])
    }

    /// Replaces the record at `slot` with `record`, per the five cases of
    /// the reallocate-slot protocol.
    pub fn set_record(&mut self, slot: u16, record: &[u8]) -> Result<(), HeapPageError> {
        self.check_record_slot(slot)?;
        let slot_count = self.get_slot_count();

        let (slot_offset, slot_length, free_length) = {
            let slots = self.slot_array_ref(slot_count);
            let s = slots.slot_ref(slot as u32)?;
            let f = slots.slot_ref(FREESPACE_SLOT)?;
            (s.offset()? as usize, s.length()? as usize, f.length()? as usize)
        };

        let new_len = record.len();

        if new_len == slot_length {
            let start = HEADER_SIZE + slot_offset;
            self.bytes[start..start + new_len].copy_from_slice(record);
            return Ok(());
        }

        if new_len < slot_length {
            let start = HEADER_SIZE + slot_offset;
            self.bytes[start..start + new_len].copy_from_slice(record);
            let mut slots = self.slot_array_mut(slot_count);
            slots.set_slot(slot as u32, slot_offset as u16, new_len.to_u16().expect("shrinking never overflows"))?;
            drop(slots);
            return self.compact();
        }

        if new_len <= slot_length + free_length {
            self.reallocate_slot(slot, record)?;
            return Ok(());
        }

        if new_len <= MAX_RECORD_LEN {
            return Err(HeapPageError::InsufficientPageSpace {
                needed: new_len,
                available: slot_length + free_length,
            });
        }

        Err(HeapPageError::RecordExceedsMaxSize {
            len: new_len,
            max: MAX_RECORD_LEN,
        })
    }

    /// Implements the reallocate-slot protocol (grow/shrink-with-reshuffle):
    /// tombstone the slot, compact around it, then re-materialize it with
    /// the new bytes in the freshly-reclaimed freespace.
    fn reallocate_slot(&mut self, slot: u16, record: &[u8]) -> Result<(), HeapPageError> {
        let slot_count = self.get_slot_count();
        {
            let mut slots = self.slot_array_mut(slot_count);
            slots.slot_mut(slot as u32)?.set_flags(SlotFlags::DELETED);
        }
        self.compact()?;

        let record_offset = {
            let slots = self.slot_array_ref(slot_count);
            slots.slot_ref(FREESPACE_SLOT)?.offset()?
        };
        let record_len = record
            .len()
            .to_u16()
            .expect("caller already checked this fits in MAX_RECORD_LEN");

        {
            let mut slots = self.slot_array_mut(slot_count);
            let mut s = slots.slot_mut(slot as u32)?;
            s.set_flags(SlotFlags::ON_PAGE);
            s.set_offset(record_offset)?;
            s.set_length(record_len)?;
        }

        let start = HEADER_SIZE + record_offset as usize;
        self.bytes[start..start + record.len()].copy_from_slice(record);

        self.update_freespace_slot(record_offset + record_len, slot_count)?;
        tracing::debug!(page_id = ?self.page_id(), slot, "reallocated slot");
        Ok(())
    }

    /// Marks `slot` deleted (idempotent) and compacts.
    pub fn delete_record(&mut self, slot: u16) -> Result<(), HeapPageError> {
        self.check_record_slot(slot)?;
        let slot_count = self.get_slot_count();
        {
            let slots = self.slot_array_ref(slot_count);
            if slots.slot_ref(slot as u32)?.flags().is_deleted() {
                return Ok(());
            }
        }
        {
            let mut slots = self.slot_array_mut(slot_count);
            slots.slot_mut(slot as u32)?.set_flags(SlotFlags::DELETED);
        }
        self.compact()
    }

    /// Rewrites live record bytes contiguously from the low end of the
    /// body, in slot-index order, without changing slot count or renumbering
    /// slots. See the reallocate-slot protocol for why this single pass
    /// serves both delete and resize.
    fn compact(&mut self) -> Result<(), HeapPageError> {
        let slot_count = self.get_slot_count();

        if slot_count == 1 {
            let mut slots = self.slot_array_mut(1);
            slots
                .slot_mut(FREESPACE_SLOT)?
                .set_flags(SlotFlags::ON_PAGE);
            slots.set_slot(FREESPACE_SLOT, 0, (BODY_LEN - 2 * SLOT_SIZE) as u16)?;
            return Ok(());
        }

        let mut scratch = vec![0u8; BODY_LEN];
        let mut cursor: u16 = 0;

        for i in 1..slot_count {
            let (flags, offset, length) = {
                let slots = self.slot_array_ref(slot_count);
                let s = slots.slot_ref(i as u32)?;
                (s.flags(), s.offset()?, s.length()?)
            };

            if flags.is_deleted() {
                let mut slots = self.slot_array_mut(slot_count);
                slots.set_slot(i as u32, DELETED_SENTINEL, DELETED_SENTINEL)?;
                continue;
            }

            let src_start = HEADER_SIZE + offset as usize;
            let dst_start = cursor as usize;
            scratch[dst_start..dst_start + length as usize]
                .copy_from_slice(&self.bytes[src_start..src_start + length as usize]);

            let mut slots = self.slot_array_mut(slot_count);
            slots.set_slot(i as u32, cursor, length)?;
            cursor += length;
        }

        let directory_len = (slot_count as usize + 1) * SLOT_SIZE;
        let directory_start = BODY_LEN - directory_len;
        scratch[directory_start..].copy_from_slice(&self.body()[directory_start..]);
        self.body_mut().copy_from_slice(&scratch);

        let old_free = self.get_free_space();
        self.update_freespace_slot(cursor, slot_count)?;
        let reclaimed = self.get_free_space().saturating_sub(old_free);
        tracing::debug!(page_id = ?self.page_id(), reclaimed, "compacted heap data page");
        Ok(())
    }

    /// Resets the page to its freshly-created empty state.
    pub fn clear(&mut self) {
        self.reset_to_empty();
    }

    /// Serializes the page: for a heap data page this is the identity on
    /// the owned buffer (the slot directory and header are maintained
    /// in-place by every mutating call above).
    pub fn marshal(&self) -> [u8; PAGE_SIZE] {
        *self.bytes
    }

    /// Deserializes `buf` into a heap data page. `buf` must be exactly
    /// [`PAGE_SIZE`] bytes and carry the `HeapData` type tag; both are
    /// invariants enforced upstream by the store, so a violation here
    /// indicates corrupt storage or a programmer error and is fatal.
    pub fn unmarshal(buf: &[u8]) -> Self {
        assert_eq!(buf.len(), PAGE_SIZE, "heap data page buffer has the wrong size");
        let tag = buf[crate::header::PAGE_TYPE_OFFSET];
        assert_eq!(
            tag,
            u8::from(PageType::HeapData),
            "buffer does not carry the heap-data page type tag"
        );
        let mut bytes = Box::new([0u8; PAGE_SIZE]);
        bytes.copy_from_slice(buf);
        HeapDataPage { bytes }
    }

    /// Like [`Self::unmarshal`], but overwrites this page's existing buffer
    /// in place instead of allocating a new one — the fill side of a
    /// pooled-page read.
    pub fn unmarshal_into(&mut self, buf: &[u8]) {
        assert_eq!(buf.len(), PAGE_SIZE, "heap data page buffer has the wrong size");
        let tag = buf[crate::header::PAGE_TYPE_OFFSET];
        assert_eq!(
            tag,
            u8::from(PageType::HeapData),
            "buffer does not carry the heap-data page type tag"
        );
        self.bytes.copy_from_slice(buf);
    }

    fn header_ref(&self) -> HeaderRef<'_> {
        HeaderRef::new((&self.bytes[0..HEADER_SIZE]).try_into().expect("fixed size"))
    }

    fn header_mut(&mut self) -> HeaderMut<'_> {
        HeaderMut::new((&mut self.bytes[0..HEADER_SIZE]).try_into().expect("fixed size"))
    }

    fn body(&self) -> &[u8] {
        &self.bytes[HEADER_SIZE..]
    }

    fn body_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[HEADER_SIZE..]
    }

    fn slot_array_ref(&self, slot_count: u16) -> SlotArrayRef<'_> {
        SlotArrayRef::new(self.body(), slot_count).expect("slot count always matches the body length")
    }

    fn slot_array_mut(&mut self, slot_count: u16) -> SlotArrayMut<'_> {
        SlotArrayMut::new(self.body_mut(), slot_count).expect("slot count always matches the body length")
    }
}

impl Default for HeapDataPage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_page_has_full_freespace_and_one_slot() {
        let page = HeapDataPage::new();
        assert_eq!(page.get_free_space(), BODY_LEN - 2 * SLOT_SIZE);
        assert_eq!(page.get_slot_count(), 1);
    }

    #[test]
    fn add_record_then_get_record_roundtrips() {
        let mut page = HeapDataPage::new();
        let slot = page.add_record(b"hello world").unwrap();
        assert_eq!(page.get_record(slot).unwrap(), b"hello world");
    }

    #[test]
    fn add_record_rejects_when_too_large_for_remaining_space() {
        let mut page = HeapDataPage::new();
        let free = page.get_free_space();
        let oversized = vec![0u8; free + 1];
        let err = page.add_record(&oversized).unwrap_err();
        assert!(matches!(err, HeapPageError::InsufficientPageSpace { .. }));
    }

    #[test]
    fn fill_with_107_byte_records_yields_72_successful_inserts() {
        let mut page = HeapDataPage::new();
        let record = vec![7u8; 107];
        let mut count = 0;
        loop {
            match page.add_record(&record) {
                Ok(slot) => {
                    assert_eq!(page.get_record(slot).unwrap(), &record[..]);
                    count += 1;
                }
                Err(HeapPageError::InsufficientPageSpace { .. }) => break,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(count, 72);
    }

    #[test]
    fn get_record_on_slot_zero_is_invalid_rid() {
        let page = HeapDataPage::new();
        let err = page.get_record(0).unwrap_err();
        assert!(matches!(err, HeapPageError::InvalidRid { slot: 0 }));
    }

    #[test]
    fn delete_record_is_idempotent_and_marks_deleted() {
        let mut page = HeapDataPage::new();
        let slot = page.add_record(b"abc").unwrap();
        page.delete_record(slot).unwrap();
        assert!(matches!(
            page.get_record(slot).unwrap_err(),
            HeapPageError::RecordDeleted { .. }
        ));
        // second delete succeeds (idempotent)
        page.delete_record(slot).unwrap();
    }

    #[test]
    fn delete_then_compact_reclaims_space() {
        let mut page = HeapDataPage::new();
        let record = vec![1u8; 107];
        let mut slots = Vec::new();
        loop {
            match page.add_record(&record) {
                Ok(s) => slots.push(s),
                Err(_) => break,
            }
        }
        let slot_count = page.get_slot_count();
        for &s in &slots[..slots.len()] {
            page.delete_record(s).unwrap();
        }
        assert_eq!(page.get_slot_count(), slot_count);
        let expected_free = BODY_LEN - (slot_count as usize + 1) * SLOT_SIZE;
        assert_eq!(page.get_free_space(), expected_free);
    }

    #[test]
    fn set_record_same_length_overwrites_in_place() {
        let mut page = HeapDataPage::new();
        let slot = page.add_record(b"aaaa").unwrap();
        page.set_record(slot, b"bbbb").unwrap();
        assert_eq!(page.get_record(slot).unwrap(), b"bbbb");
    }

    #[test]
    fn set_record_shrinking_then_growing_round_trips_free_space() {
        let mut page = HeapDataPage::new();
        let mut slots = Vec::new();
        for _ in 0..50 {
            slots.push(page.add_record(&vec![9u8; 54]).unwrap());
        }
        let free_after_round1 = page.get_free_space();
        for &s in &slots {
            page.set_record(s, &vec![9u8; 108]).unwrap();
        }
        let free_after_round2 = page.get_free_space();
        assert!(free_after_round2 < free_after_round1);
        for &s in &slots {
            page.set_record(s, &vec![9u8; 54]).unwrap();
        }
        assert_eq!(page.get_free_space(), free_after_round1);
    }

    #[test]
    fn set_record_other_slots_unaffected() {
        let mut page = HeapDataPage::new();
        let a = page.add_record(b"AAAA").unwrap();
        let b = page.add_record(b"BBBB").unwrap();
        page.set_record(a, b"XYZXYZXYZXYZ").unwrap();
        assert_eq!(page.get_record(b).unwrap(), b"BBBB");
    }

    #[test]
    fn set_record_too_large_for_page_but_within_max_is_insufficient_space() {
        let mut page = HeapDataPage::new();
        let slot = page.add_record(b"x").unwrap();
        let oversized = vec![0u8; MAX_RECORD_LEN];
        let err = page.set_record(slot, &oversized).unwrap_err();
        assert!(matches!(err, HeapPageError::InsufficientPageSpace { .. }));
    }

    #[test]
    fn set_record_beyond_max_record_len_is_record_exceeds_max_size() {
        let mut page = HeapDataPage::new();
        let slot = page.add_record(b"x").unwrap();
        let oversized = vec![0u8; MAX_RECORD_LEN + 1];
        let err = page.set_record(slot, &oversized).unwrap_err();
        assert!(matches!(err, HeapPageError::RecordExceedsMaxSize { .. }));
    }

    #[test]
    fn clear_resets_to_fresh_state() {
        let mut page = HeapDataPage::new();
        page.add_record(b"abc").unwrap();
        page.clear();
        assert_eq!(page.get_slot_count(), 1);
        assert_eq!(page.get_free_space(), BODY_LEN - 2 * SLOT_SIZE);
    }

    #[test]
    fn marshal_then_unmarshal_preserves_observable_state() {
        let mut page = HeapDataPage::new();
        page.set_page_id(PageId::new(5));
        let slot = page.add_record(b"roundtrip me").unwrap();
        let bytes = page.marshal();
        let restored = HeapDataPage::unmarshal(&bytes);
        assert_eq!(restored.page_id(), PageId::new(5));
        assert_eq!(restored.get_slot_count(), page.get_slot_count());
        assert_eq!(restored.get_record(slot).unwrap(), b"roundtrip me");
        assert_eq!(restored.get_free_space(), page.get_free_space());
    }

    #[test]
    #[should_panic]
    fn unmarshal_panics_on_wrong_size_buffer() {
        let buf = vec![0u8; PAGE_SIZE - 1];
        HeapDataPage::unmarshal(&buf);
    }

    #[test]
    #[should_panic]
    fn unmarshal_panics_on_wrong_type_tag() {
        let mut buf = vec![0u8; PAGE_SIZE];
        buf[crate::header::PAGE_TYPE_OFFSET] = u8::from(PageType::HeapHeader);
        HeapDataPage::unmarshal(&buf);
    }
}
