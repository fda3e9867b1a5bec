//! CSV repository for material receipts.

use anyhow::Result;
use shared::MaterialReceipt;

use super::connection::CsvConnection;

const RECEIPTS: &str = "material_receipts";

#[derive(Clone)]
pub struct ReceiptRepository {
    connection: CsvConnection,
}

impl ReceiptRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    pub fn list(&self) -> Result<Vec<MaterialReceipt>> {
        self.connection.read_table(RECEIPTS)
    }

    pub fn store_many(&self, new_rows: Vec<MaterialReceipt>) -> Result<()> {
        let mut rows: Vec<MaterialReceipt> = self.connection.read_table(RECEIPTS)?;
        rows.extend(new_rows);
        self.connection.write_table(RECEIPTS, &rows)
    }
}
