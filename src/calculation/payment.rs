//! Payment instructions for the external payment collaborator.

use crate::models::{PaymentInstruction, PaymentStatus, ResultRecord};

/// Builds one payment instruction per record with a positive net amount.
///
/// Records with nothing to pay are skipped. Input order is preserved.
pub fn payment_instructions(
    records: &[ResultRecord],
    requested_status: PaymentStatus,
) -> Vec<PaymentInstruction> {
    records
        .iter()
        .filter(|record| record.net_amount > 0)
        .map(|record| PaymentInstruction {
            employee_code: record.employee_code.clone(),
            period: record.period,
            kind: record.kind,
            net_amount: record.net_amount,
            requested_status,
        })
        .collect()
}
