//! Two-block journaled parameter store.
//!
//! Units are numbered opaque records appended to a journal:
//!
//! ```text
//! block:  ┌───────┬──────────────┬──────────────┬────┬──────────┐
//!         │ magic │ id flags len │   payload    │ …  │ ff ff ff │
//!         └───────┴──────────────┴──────────────┴────┴──────────┘
//! ```
//!
//! The last record for a unit wins; erasing appends a tombstone. When the
//! active block runs out of room, live units are compacted into the
//! sibling block and the roles swap, which doubles as crude wear
//! leveling. `0xff` marks unwritten space, matching erased flash.
//!
//! On the target the blocks mirror a dedicated data partition
//! (write-through on every mutation — journal writes are operator-driven
//! and rare). Host builds keep the blocks in RAM as the simulation
//! backend.

use log::{info, warn};

use crate::console::ports::{ParamStore, RawBlock, StoreError, UnitId};

/// Size of each journal block.
pub const BLOCK_SIZE: usize = 1024;

/// Flash offset the parameter area is mapped at; display origin for dumps.
const PARAM_AREA_BASE: u32 = 0x0011_0000;

const MAGIC: [u8; 4] = *b"PRM1";
const HEADER_LEN: usize = 4;
const REC_HEADER_LEN: usize = 4;

const FLAG_TOMBSTONE: u8 = 0x01;
/// Unit id that can never be written; marks unwritten journal space.
const FREE_ID: u8 = 0xFF;

/// In-memory image of the two journal blocks.
pub struct BlockStore {
    blocks: [[u8; BLOCK_SIZE]; 2],
    active: usize,
    cursor: usize,
    opened: bool,
}

impl BlockStore {
    /// Blank, unformatted store (both blocks erased).
    pub fn new() -> Self {
        Self {
            blocks: [[FREE_ID; BLOCK_SIZE]; 2],
            active: 0,
            cursor: HEADER_LEN,
            opened: false,
        }
    }

    /// Formatted, opened, empty store — the simulation boot state.
    pub fn new_formatted() -> Self {
        let mut store = Self::new();
        store.blocks[0][..4].copy_from_slice(&MAGIC);
        store.active = 0;
        store.cursor = HEADER_LEN;
        store.opened = true;
        store
    }

    // ── Journal scanning ──────────────────────────────────────

    /// Iterate `(offset, id, flags, payload_len)` over valid records in
    /// `block`, stopping at free space or a malformed header.
    fn records(block: &[u8; BLOCK_SIZE]) -> impl Iterator<Item = (usize, u8, u8, usize)> + '_ {
        let mut offset = HEADER_LEN;
        core::iter::from_fn(move || {
            if offset + REC_HEADER_LEN > BLOCK_SIZE {
                return None;
            }
            let id = block[offset];
            if id == FREE_ID {
                return None;
            }
            let flags = block[offset + 1];
            let len = u16::from_le_bytes([block[offset + 2], block[offset + 3]]) as usize;
            if offset + REC_HEADER_LEN + len > BLOCK_SIZE {
                return None;
            }
            let rec = (offset, id, flags, len);
            offset += REC_HEADER_LEN + len;
            Some(rec)
        })
    }

    /// Offset and length of the latest live payload for `id`.
    fn find_live(&self, id: UnitId) -> Option<(usize, usize)> {
        let mut hit = None;
        for (offset, rec_id, flags, len) in Self::records(&self.blocks[self.active]) {
            if rec_id == id {
                hit = (flags & FLAG_TOMBSTONE == 0).then_some((offset + REC_HEADER_LEN, len));
            }
        }
        hit
    }

    /// First free offset in the active block.
    fn scan_cursor(&self) -> usize {
        Self::records(&self.blocks[self.active])
            .last()
            .map_or(HEADER_LEN, |(offset, _, _, len)| {
                offset + REC_HEADER_LEN + len
            })
    }

    fn append(&mut self, id: UnitId, flags: u8, data: &[u8]) -> Result<(), StoreError> {
        let needed = REC_HEADER_LEN + data.len();
        if self.cursor + needed > BLOCK_SIZE {
            self.compact();
            if self.cursor + needed > BLOCK_SIZE {
                return Err(StoreError::Full);
            }
        }
        let block = &mut self.blocks[self.active];
        block[self.cursor] = id;
        block[self.cursor + 1] = flags;
        block[self.cursor + 2..self.cursor + 4].copy_from_slice(&(data.len() as u16).to_le_bytes());
        block[self.cursor + 4..self.cursor + 4 + data.len()].copy_from_slice(data);
        self.cursor += needed;
        self.persist();
        Ok(())
    }

    /// Copy the latest live record of every unit into the sibling block,
    /// wipe the old one, and swap roles.
    fn compact(&mut self) {
        let from = self.active;
        let to = 1 - from;

        let mut fresh = [FREE_ID; BLOCK_SIZE];
        fresh[..4].copy_from_slice(&MAGIC);
        let mut write = HEADER_LEN;

        let src = &self.blocks[from];
        for (offset, id, flags, len) in Self::records(src) {
            let superseded =
                Self::records(src).any(|(later, later_id, _, _)| later > offset && later_id == id);
            if superseded || flags & FLAG_TOMBSTONE != 0 {
                continue;
            }
            let total = REC_HEADER_LEN + len;
            fresh[write..write + total].copy_from_slice(&src[offset..offset + total]);
            write += total;
        }

        self.blocks[to] = fresh;
        self.blocks[from] = [FREE_ID; BLOCK_SIZE];
        self.active = to;
        self.cursor = write;
        info!("parameter store compacted into block {}", to);
    }

    // ── Flash mirroring ───────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn partition() -> Option<*const esp_idf_svc::sys::esp_partition_t> {
        use esp_idf_svc::sys::{
            esp_partition_find_first, esp_partition_subtype_t_ESP_PARTITION_SUBTYPE_ANY,
            esp_partition_type_t_ESP_PARTITION_TYPE_DATA,
        };
        let label = b"params\0";
        // SAFETY: label is a valid NUL-terminated string for the call.
        let part = unsafe {
            esp_partition_find_first(
                esp_partition_type_t_ESP_PARTITION_TYPE_DATA,
                esp_partition_subtype_t_ESP_PARTITION_SUBTYPE_ANY,
                label.as_ptr().cast(),
            )
        };
        (!part.is_null()).then_some(part)
    }

    #[cfg(target_os = "espidf")]
    fn persist(&mut self) {
        use esp_idf_svc::sys::{esp_partition_erase_range, esp_partition_write, ESP_OK};
        let Some(part) = Self::partition() else {
            warn!("params partition missing, storage is volatile");
            return;
        };
        // SAFETY: the partition handle is valid and the image fits the
        // erase range; writes go through the partition API only.
        unsafe {
            if esp_partition_erase_range(part, 0, 2 * BLOCK_SIZE) != ESP_OK {
                warn!("params partition erase failed");
                return;
            }
            for (i, block) in self.blocks.iter().enumerate() {
                let ret = esp_partition_write(
                    part,
                    i * BLOCK_SIZE,
                    block.as_ptr().cast(),
                    BLOCK_SIZE,
                );
                if ret != ESP_OK {
                    warn!("params partition write failed on block {}", i);
                }
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn restore(&mut self) {
        use esp_idf_svc::sys::{esp_partition_read, ESP_OK};
        let Some(part) = Self::partition() else {
            warn!("params partition missing, starting blank");
            return;
        };
        for (i, block) in self.blocks.iter_mut().enumerate() {
            // SAFETY: destination buffer is BLOCK_SIZE bytes as declared.
            let ret = unsafe {
                esp_partition_read(part, i * BLOCK_SIZE, block.as_mut_ptr().cast(), BLOCK_SIZE)
            };
            if ret != ESP_OK {
                warn!("params partition read failed on block {}", i);
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn persist(&mut self) {}

    #[cfg(not(target_os = "espidf"))]
    fn restore(&mut self) {}
}

impl Default for BlockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamStore for BlockStore {
    fn format(&mut self) -> Result<(), StoreError> {
        self.blocks = [[FREE_ID; BLOCK_SIZE]; 2];
        self.blocks[0][..4].copy_from_slice(&MAGIC);
        self.active = 0;
        self.cursor = HEADER_LEN;
        self.opened = false;
        self.persist();
        Ok(())
    }

    fn init(&mut self) -> Result<(), StoreError> {
        if !self.opened {
            self.restore();
        }
        let active = if self.blocks[0][..4] == MAGIC {
            0
        } else if self.blocks[1][..4] == MAGIC {
            1
        } else {
            warn!("no valid parameter block header");
            return Err(StoreError::Corrupt);
        };
        self.active = active;
        self.cursor = self.scan_cursor();
        self.opened = true;
        info!(
            "parameter store opened: block {}, {} bytes used",
            active, self.cursor
        );
        Ok(())
    }

    fn read_unit(&self, id: UnitId, buf: &mut [u8]) -> Result<usize, StoreError> {
        let (offset, len) = self.find_live(id).ok_or(StoreError::NotFound)?;
        let n = len.min(buf.len());
        buf[..n].copy_from_slice(&self.blocks[self.active][offset..offset + n]);
        Ok(n)
    }

    fn write_unit(&mut self, id: UnitId, data: &[u8]) -> Result<(), StoreError> {
        if id == FREE_ID {
            return Err(StoreError::WriteFailed);
        }
        if REC_HEADER_LEN + data.len() > BLOCK_SIZE - HEADER_LEN {
            return Err(StoreError::Full);
        }
        self.append(id, 0, data)
    }

    fn erase_unit(&mut self, id: UnitId) -> Result<(), StoreError> {
        if self.find_live(id).is_none() {
            return Ok(());
        }
        self.append(id, FLAG_TOMBSTONE, &[])
    }

    fn raw_blocks(&self) -> [RawBlock<'_>; 2] {
        [
            RawBlock {
                origin: PARAM_AREA_BASE,
                bytes: &self.blocks[0],
            },
            RawBlock {
                origin: PARAM_AREA_BASE + BLOCK_SIZE as u32,
                bytes: &self.blocks[1],
            },
        ]
    }
}
