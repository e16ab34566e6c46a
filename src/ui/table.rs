use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::tier_color;
use crate::data::filter::SelectionView;

/// One row per selected country: name, tier, both balances.
pub fn selection_table(ui: &mut Ui, view: &SelectionView) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(140.0))
        .column(Column::auto().at_least(150.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Country");
            });
            header.col(|ui| {
                ui.strong("Income level");
            });
            header.col(|ui| {
                ui.strong("Current account");
            });
            header.col(|ui| {
                ui.strong("Budget balance");
            });
        })
        .body(|mut body| {
            for row in &view.rows {
                body.row(18.0, |mut table_row| {
                    table_row.col(|ui| {
                        ui.label(row.record.country.as_str());
                    });
                    table_row.col(|ui| {
                        ui.label(
                            RichText::new(row.income_tier.label())
                                .color(tier_color(row.income_tier)),
                        );
                    });
                    table_row.col(|ui| {
                        ui.label(format!("{:.2}", row.record.current_account_balance));
                    });
                    table_row.col(|ui| {
                        ui.label(format!("{:.2}", row.record.budget_balance));
                    });
                });
            }
        });
}
