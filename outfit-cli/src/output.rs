use std::fmt;

use outfit_core::{ForecastDayReport, Outfit, OutfitReport};

/// Human-readable view of the current-weather report.
pub struct CurrentView<'a>(pub &'a OutfitReport);

/// Human-readable view of a multi-day forecast.
pub struct ForecastView<'a> {
    pub location: &'a str,
    pub days: &'a [ForecastDayReport],
}

impl fmt::Display for CurrentView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(
            f,
            "{}: {}°{} (feels like {}°{}), {}, humidity {}%",
            report.location,
            report.temperature,
            report.unit,
            report.feels_like,
            report.unit,
            report.condition,
            report.humidity,
        )?;
        write_outfit(f, &report.outfit)?;
        write_tips(f, &report.tips)
    }
}

impl fmt::Display for ForecastView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Forecast for {}", self.location)?;
        for day in self.days {
            writeln!(
                f,
                "\n{} {}: {}°{} (high {}° / low {}°), {}",
                day.day, day.date, day.temperature, day.unit, day.high, day.low, day.condition,
            )?;
            write_outfit(f, &day.outfit)?;
            write_tips(f, &day.tips)?;
        }
        Ok(())
    }
}

fn write_outfit(f: &mut fmt::Formatter<'_>, outfit: &Outfit) -> fmt::Result {
    writeln!(f, "  Top:       {}", pretty(&outfit.top))?;
    writeln!(f, "  Bottom:    {}", pretty(&outfit.bottom))?;
    writeln!(f, "  Footwear:  {}", pretty(&outfit.footwear))?;
    writeln!(f, "  Accessory: {}", pretty(&outfit.accessory))
}

fn write_tips(f: &mut fmt::Formatter<'_>, tips: &[String]) -> fmt::Result {
    if tips.is_empty() {
        return Ok(());
    }
    writeln!(f, "  Tips:")?;
    for tip in tips {
        writeln!(f, "   - {tip}")?;
    }
    Ok(())
}

fn pretty(label: &str) -> String {
    label.replace('_', " ")
}
