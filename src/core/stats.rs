use comfy_table::{presets, CellAlignment, ColumnConstraint, Table, Width};
use serde::Serialize;
use std::ops::AddAssign;

/// Counters for one command run. Printed once at the end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingStats {
    pub created: usize,
    pub created_errors: usize,
    pub updated: usize,
    pub updated_errors: usize,
    pub added_to_package: usize,
    pub added_to_package_errors: usize,
    pub flows_updated: usize,
    pub flows_updated_errors: usize,
    pub deleted: usize,
    pub deleted_errors: usize,
}

impl ProcessingStats {
    pub fn total_errors(&self) -> usize {
        self.created_errors
            + self.updated_errors
            + self.added_to_package_errors
            + self.flows_updated_errors
            + self.deleted_errors
    }

    fn rows(&self) -> [(&'static str, usize, usize); 5] {
        [
            ("Connection References Created", self.created, self.created_errors),
            ("Connection References Updated", self.updated, self.updated_errors),
            ("Added to Solution", self.added_to_package, self.added_to_package_errors),
            ("Flows Updated", self.flows_updated, self.flows_updated_errors),
            ("Connection References Deleted", self.deleted, self.deleted_errors),
        ]
    }

    /// Summary table; `plain` selects an ASCII border set.
    pub fn render_summary(&self, plain: bool) -> String {
        let mut table = Table::new();
        table
            .load_preset(if plain {
                presets::ASCII_FULL_CONDENSED
            } else {
                presets::UTF8_FULL_CONDENSED
            })
            .set_header(vec!["Operation", "Succeeded", "Errors"]);

        for (label, ok, errors) in self.rows() {
            table.add_row(vec![label.to_string(), ok.to_string(), errors.to_string()]);
        }
        table.add_row(vec![
            "Total Errors".to_string(),
            String::new(),
            self.total_errors().to_string(),
        ]);

        for index in 1..=2 {
            if let Some(column) = table.column_mut(index) {
                column.set_cell_alignment(CellAlignment::Right);
                column.set_constraint(ColumnConstraint::LowerBoundary(Width::Fixed(9)));
            }
        }
        table.to_string()
    }
}

impl AddAssign for ProcessingStats {
    fn add_assign(&mut self, other: Self) {
        self.created += other.created;
        self.created_errors += other.created_errors;
        self.updated += other.updated;
        self.updated_errors += other.updated_errors;
        self.added_to_package += other.added_to_package;
        self.added_to_package_errors += other.added_to_package_errors;
        self.flows_updated += other.flows_updated;
        self.flows_updated_errors += other.flows_updated_errors;
        self.deleted += other.deleted;
        self.deleted_errors += other.deleted_errors;
    }
}
