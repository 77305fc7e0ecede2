//! Hierarchical address allocation.

use mdindex_shared::{AddrStyle, MAX_HEADING_LEVEL, SectionEntry};

const SLOTS: usize = MAX_HEADING_LEVEL as usize + 1;

/// Per-run counter state. Slot 0 is unused so `counters[level]` reads naturally.
///
/// Create a fresh allocator for every numbering pass.
#[derive(Debug, Clone)]
pub struct AddressAllocator {
    style: AddrStyle,
    counters: [usize; SLOTS],
}

impl AddressAllocator {
    pub fn new(style: AddrStyle) -> Self {
        Self {
            style,
            counters: [0; SLOTS],
        }
    }

    /// Allocate the address for the next title at `level` (clamped to 1..=6).
    ///
    /// Deeper counters are zeroed on every allocation, so children restart at
    /// 1 under each new parent. The counter at `level` itself keeps running
    /// across deeper excursions: `##`, `###`, `##` numbers the second `##` as
    /// the next sibling of the first.
    pub fn next(&mut self, level: u8) -> String {
        let level = usize::from(level).clamp(1, SLOTS - 1);

        self.counters[level] += 1;
        self.counters[level + 1..].fill(0);

        match self.style {
            AddrStyle::Path => self.counters[1..=level]
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join("."),
            AddrStyle::LevelCounter => format!("{level}.{}", self.counters[level]),
        }
    }

    /// Counter for `level` after the last allocation.
    pub fn counter(&self, level: u8) -> usize {
        self.counters
            .get(usize::from(level))
            .copied()
            .unwrap_or_default()
    }
}

/// Reassign every entry's address with a fresh allocator, in slice order.
pub fn renumber(entries: &mut [SectionEntry], style: AddrStyle) {
    let mut allocator = AddressAllocator::new(style);
    for entry in entries {
        entry.addr = allocator.next(entry.level);
    }
}
