//! Per-task averages for a request's utilization record

use crate::models::RequestUtilization;
use serde::Serialize;

/// Average used and reserved amount of a resource per task
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerTaskUsage {
    pub used: f64,
    pub reserved: f64,
}

impl PerTaskUsage {
    /// Fraction of the reservation in use, `None` when nothing is reserved
    pub fn proportion(&self) -> Option<f64> {
        if self.reserved > 0.0 && self.reserved.is_finite() {
            Some(self.used / self.reserved)
        } else {
            None
        }
    }
}

/// Divide a request-wide total by its task count.
///
/// Returns `None` for a zero task count instead of producing a non-finite value.
pub fn per_task(total: f64, num_tasks: u32) -> Option<f64> {
    if num_tasks == 0 {
        None
    } else {
        Some(total / f64::from(num_tasks))
    }
}

impl RequestUtilization {
    /// Average CPU used and reserved per task
    pub fn cpu_per_task(&self) -> Option<PerTaskUsage> {
        Some(PerTaskUsage {
            used: per_task(self.cpu_used, self.num_tasks)?,
            reserved: per_task(self.cpu_reserved, self.num_tasks)?,
        })
    }

    /// Average memory bytes used and reserved per task
    pub fn memory_per_task(&self) -> Option<PerTaskUsage> {
        Some(PerTaskUsage {
            used: per_task(self.mem_bytes_used as f64, self.num_tasks)?,
            reserved: per_task(self.mem_bytes_reserved as f64, self.num_tasks)?,
        })
    }
}
