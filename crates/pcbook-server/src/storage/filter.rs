//! Threshold predicate used by laptop search.

use pcbook_proto::v1::{Filter, Laptop, Memory, MemoryUnit};

/// Whether `laptop` satisfies every bound in `filter`.
///
/// A `max_price_usd` of zero means no price ceiling.
pub fn is_qualified(filter: &Filter, laptop: &Laptop) -> bool {
    if filter.max_price_usd > 0.0 && laptop.price_usd > filter.max_price_usd {
        return false;
    }

    let (cores, ghz) = laptop
        .cpu
        .as_ref()
        .map_or((0, 0.0), |cpu| (cpu.number_cores, cpu.min_ghz));
    if cores < filter.min_cpu_cores || ghz < filter.min_cpu_ghz {
        return false;
    }

    let required = filter.min_ram.as_ref().map_or(0, memory_to_bits);
    let available = laptop.ram.as_ref().map_or(0, memory_to_bits);
    available >= required
}

/// Convert a memory size to bits, saturating on overflow.
///
/// An unspecified unit counts as zero.
pub fn memory_to_bits(memory: &Memory) -> u64 {
    let value = memory.value;
    match MemoryUnit::try_from(memory.unit).unwrap_or(MemoryUnit::Unspecified) {
        MemoryUnit::Unspecified => 0,
        MemoryUnit::Bit => value,
        MemoryUnit::Byte => value.saturating_mul(8),
        MemoryUnit::Kilobyte => value.saturating_mul(8 << 10),
        MemoryUnit::Megabyte => value.saturating_mul(8 << 20),
        MemoryUnit::Gigabyte => value.saturating_mul(8 << 30),
        MemoryUnit::Terabyte => value.saturating_mul(8 << 40),
    }
}
