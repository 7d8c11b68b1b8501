use fan_core::{event::Message, state::PanelState, status::CurvePoint};
use fan_theme::Theme;
use iced::{
    widget::{column, text, Column},
    Element,
};

/// Fan-curve tables, when the backend includes them in its status.
#[derive(Debug, Default)]
pub struct CurveWidget;

impl CurveWidget {
    pub fn new() -> Self {
        Self
    }

    /// Returns `None` when no curve was reported — callers should skip rendering.
    pub fn view<'a>(
        &'a self,
        state: &'a PanelState,
        theme: &'a Theme,
    ) -> Option<Element<'a, Message>> {
        let curves = [
            ("CPU curve", state.status.cpu_curve.as_deref()),
            ("GPU curve", state.status.gpu_curve.as_deref()),
        ];

        let rows: Vec<Element<'a, Message>> = curves
            .into_iter()
            .filter_map(|(label, points)| {
                let points = points.filter(|p| !p.is_empty())?;
                Some(
                    column![
                        text(label).size(theme.small_size()),
                        text(format_curve(points))
                            .size(theme.small_size())
                            .color(theme.foreground.with_alpha(0.7).to_iced()),
                    ]
                    .into(),
                )
            })
            .collect();

        if rows.is_empty() {
            return None;
        }
        Some(Column::with_children(rows).spacing(4.0).into())
    }
}

/// `"30°→20% 40°→35% …"`, ordered by point index.
fn format_curve(points: &[CurvePoint]) -> String {
    let mut sorted = points.to_vec();
    sorted.sort_by_key(|p| p.index);
    sorted
        .iter()
        .map(|p| format!("{}°→{}%", p.temp_c, p.duty_percent()))
        .collect::<Vec<_>>()
        .join(" ")
}
