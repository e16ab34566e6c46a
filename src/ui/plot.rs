use std::collections::BTreeMap;

use eframe::egui::Ui;
use egui_plot::{Legend, Plot, PlotPoints, Points};

use crate::color::tier_color;
use crate::data::filter::SelectionView;
use crate::data::model::IncomeTier;

// ---------------------------------------------------------------------------
// Balance scatter plot (central panel)
// ---------------------------------------------------------------------------

/// Scatter of budget balance against current account balance, one series
/// per income tier so the legend doubles as a colour key.
pub fn balance_plot(ui: &mut Ui, view: &SelectionView, height: f32) {
    let mut by_tier: BTreeMap<IncomeTier, Vec<[f64; 2]>> = BTreeMap::new();
    for row in &view.rows {
        by_tier.entry(row.income_tier).or_default().push([
            row.record.current_account_balance,
            row.record.budget_balance,
        ]);
    }

    // Hover labels look up the country by exact coordinates.
    let countries: Vec<([f64; 2], String)> = view
        .rows
        .iter()
        .map(|r| {
            (
                [r.record.current_account_balance, r.record.budget_balance],
                r.record.country.clone(),
            )
        })
        .collect();

    Plot::new("balance_plot")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Current account balance")
        .y_axis_label("Budget balance")
        .label_formatter(move |name, value| {
            let country = countries
                .iter()
                .find(|(xy, _)| xy[0] == value.x && xy[1] == value.y)
                .map(|(_, c)| c.as_str());
            match country {
                Some(c) => format!("{c} ({name})\nCA: {:.2}\nBudget: {:.2}", value.x, value.y),
                None => format!("CA: {:.2}\nBudget: {:.2}", value.x, value.y),
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (tier, points) in by_tier {
                let points = Points::new(PlotPoints::from(points))
                    .name(tier.label())
                    .color(tier_color(tier))
                    .radius(5.0);
                plot_ui.points(points);
            }
        });
}
