use crate::sparkline::SparklineChart;
use fan_core::{event::Message, state::PanelState, Metric, RollingBuffer};
use fan_renderer::{render, SparklineDims};
use fan_theme::Theme;
use iced::{
    widget::{column, row, text},
    Alignment, Element, Length,
};

/// One labelled reading with its sparkline underneath.
#[derive(Debug)]
pub struct ReadingWidget {
    metric: Metric,
}

impl ReadingWidget {
    pub fn new(metric: Metric) -> Self {
        Self { metric }
    }

    pub fn view<'a>(
        &'a self,
        state: &'a PanelState,
        theme: &'a Theme,
        dims: SparklineDims,
    ) -> Element<'a, Message> {
        let history = state.history(self.metric);
        let value = self.metric.format(state.status.reading(self.metric));

        let header = row![
            text(self.metric.label())
                .size(theme.small_size())
                .width(Length::Fill),
            text(average_label(self.metric, history)).size(theme.small_size()),
            text(value).size(theme.font_size),
        ]
        .spacing(f32::from(theme.gap))
        .align_y(Alignment::Center);

        let path = render(history.iter().copied(), &dims);
        let chart = SparklineChart::new(path, theme.accent.to_iced(), dims).view();

        column![header, chart].spacing(2.0).into()
    }
}

/// "avg 61.3" over the sparkline window; empty until there is a sample.
fn average_label(metric: Metric, history: &RollingBuffer<f64>) -> String {
    history
        .average()
        .map(|avg| format!("avg {}", metric.format(Some(avg))))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_uses_the_metric_precision() {
        let temps = RollingBuffer::new(120).pushed(60.0).pushed(62.6);
        assert_eq!(average_label(Metric::CpuTemp, &temps), "avg 61.3");

        let rpm = RollingBuffer::new(120).pushed(3000.0).pushed(3100.0);
        assert_eq!(average_label(Metric::GpuFan, &rpm), "avg 3050");
    }

    #[test]
    fn no_average_without_samples() {
        assert_eq!(average_label(Metric::CpuFan, &RollingBuffer::new(120)), "");
    }
}
