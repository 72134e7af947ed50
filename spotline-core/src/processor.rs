use crate::config::SourceProfile;
use crate::consolidate::{consolidate, weeks_from_flight};
use crate::error::{OrderError, RowError};
use crate::language::{
    detect_language, resolve_block_prefixes, BlockResolution, SouthAsianChoice,
};
use crate::normalizer::CellNormalizer;
use crate::parser::{apply_sunday_rule, parse_day_pattern, TimeRangeParser};
use crate::rates::{effective_rate, is_bonus, max_daily_run};
use crate::types::*;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One order's worth of extracted table data, as handed over by the
/// layout-extraction collaborator. Disambiguation choices are collected
/// upfront by the interactive collaborator and arrive pre-resolved here —
/// the engine never prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedOrder {
    pub order_code: String,
    pub market: String,
    pub flight_start: NaiveDate,
    pub flight_end: NaiveDate,
    /// Week column dates, when the source prints them. None means the
    /// weeks derive from the flight start in 7-day steps.
    #[serde(default)]
    pub week_starts: Option<Vec<NaiveDate>>,
    pub rows: Vec<RawRow>,
    #[serde(default)]
    pub south_asian_choice: Option<SouthAsianChoice>,
}

/// Drives one order through normalize → parse → consolidate. Row errors
/// are recovered locally (skip + count); only structural failure aborts.
/// Stateless across orders — runs are fully independent.
pub struct OrderProcessor {
    profile: SourceProfile,
    normalizer: CellNormalizer,
    time_parser: TimeRangeParser,
}

impl OrderProcessor {
    pub fn new(profile: SourceProfile) -> Self {
        Self {
            profile,
            normalizer: CellNormalizer::new(),
            time_parser: TimeRangeParser::new(),
        }
    }

    pub fn profile(&self) -> &SourceProfile {
        &self.profile
    }

    /// Process one order end to end. The caller always receives both the
    /// line output and the skip diagnostics — spot loss is observable,
    /// never hidden behind a success result.
    pub fn process(&self, order: &ExtractedOrder) -> Result<OrderOutput, OrderError> {
        println!(
            "📄 Processing order {} ({} rows, flight {} - {})",
            order.order_code,
            order.rows.len(),
            order.flight_start,
            order.flight_end
        );

        if order.rows.is_empty() {
            return Err(OrderError::OrderStructureFailure(
                "no schedule rows extracted".to_string(),
            ));
        }
        if order.flight_start > order.flight_end {
            return Err(OrderError::OrderStructureFailure(format!(
                "flight window is inverted: {} - {}",
                order.flight_start, order.flight_end
            )));
        }

        // Disambiguation gate: halt before any row work if a language on
        // this order still needs its sub-choice.
        self.check_disambiguation(order)?;

        let mut diagnostics = OrderDiagnostics::new();
        diagnostics.rows_seen = order.rows.len();

        let mut specs = Vec::new();
        for row in &order.rows {
            match self.parse_row(row, order) {
                Ok(spec) => {
                    diagnostics.rows_parsed += 1;
                    specs.push(spec);
                }
                Err(err) => {
                    println!("   ⏭️  Skipping row {}: {}", row.index, err);
                    diagnostics.record_skip(row.index, err.to_string());
                }
            }
        }

        if specs.is_empty() {
            return Err(OrderError::OrderStructureFailure(format!(
                "no parseable schedule rows ({} skipped)",
                diagnostics.rows_skipped
            )));
        }

        let mut lines = Vec::new();
        for spec in &specs {
            lines.extend(self.consolidate_spec(spec, order));
        }

        println!(
            "✅ {} consolidated lines from {} rows ({} skipped)",
            lines.len(),
            diagnostics.rows_parsed,
            diagnostics.rows_skipped
        );

        Ok(OrderOutput {
            schema_version: SCHEMA_VERSION.to_string(),
            lines,
            diagnostics,
        })
    }

    fn check_disambiguation(&self, order: &ExtractedOrder) -> Result<(), OrderError> {
        for row in &order.rows {
            let program = row.cell(ColumnRole::Program).unwrap_or("");
            if let Some(language) = detect_language(program) {
                if let BlockResolution::PendingDisambiguation =
                    resolve_block_prefixes(&language, order.south_asian_choice)
                {
                    return Err(OrderError::PendingDisambiguation { language });
                }
            }
        }
        Ok(())
    }

    /// Normalize and parse one row. Day pattern is checked before the time
    /// range; a row bad in both reports the day error.
    fn parse_row(&self, row: &RawRow, order: &ExtractedOrder) -> Result<ParsedLineSpec, RowError> {
        let day_cell = row.cell(ColumnRole::Day);
        let time_cell = row.cell(ColumnRole::Time);

        // No printed schedule at all: run-of-schedule fallback from the
        // profile (bonus/language lines on some formats).
        let (days, time) = match (day_cell, time_cell) {
            (None, None) => (self.profile.ros_day_set(), self.profile.ros_time_range()),
            _ => {
                let day_text = self.normalizer.normalize(
                    ColumnRole::Day,
                    day_cell.ok_or_else(|| RowError::MalformedRow {
                        role: ColumnRole::Day,
                        text: String::new(),
                    })?,
                );
                let days = parse_day_pattern(&day_text)?;

                let time_text = self.normalizer.normalize(
                    ColumnRole::Time,
                    time_cell.ok_or_else(|| RowError::MalformedRow {
                        role: ColumnRole::Time,
                        text: String::new(),
                    })?,
                );
                (days, self.time_parser.parse(&time_text)?)
            }
        };

        let (days, active_day_count) = apply_sunday_rule(&days, &time);

        let program = row
            .cell(ColumnRole::Program)
            .unwrap_or("")
            .trim()
            .to_string();
        let language =
            detect_language(&program).unwrap_or_else(|| "Unknown".to_string());

        let net_rate = match row.cell(ColumnRole::Rate) {
            Some(raw) => {
                let cleaned = self.normalizer.normalize(ColumnRole::Rate, raw);
                if cleaned.is_empty() {
                    None
                } else {
                    Some(cleaned.parse::<f64>().map_err(|_| RowError::MalformedRow {
                        role: ColumnRole::Rate,
                        text: raw.to_string(),
                    })?)
                }
            }
            None => None,
        };

        let spot_length_seconds = match row.cell(ColumnRole::Duration) {
            Some(raw) => {
                let cleaned = self.normalizer.normalize(ColumnRole::Duration, raw);
                cleaned
                    .trim_start_matches(':')
                    .parse::<u32>()
                    .map_err(|_| RowError::MalformedRow {
                        role: ColumnRole::Duration,
                        text: raw.to_string(),
                    })?
            }
            // Standard spot length when the column is absent entirely.
            None => 30,
        };

        let mut counts = Vec::new();
        for raw in row.cells_with_role(ColumnRole::Spots) {
            let cleaned = self.normalizer.normalize(ColumnRole::Spots, raw);
            let count =
                cleaned
                    .replace(',', "")
                    .parse::<u32>()
                    .map_err(|_| RowError::MalformedRow {
                        role: ColumnRole::Spots,
                        text: raw.to_string(),
                    })?;
            counts.push(count);
        }

        let weekly = self.week_series(&counts, order)?;

        Ok(ParsedLineSpec {
            days,
            active_day_count,
            time,
            language,
            net_rate,
            spot_length_seconds,
            weekly,
            market: order.market.clone(),
            program,
        })
    }

    /// Pair weekly counts with their week-start dates: printed column
    /// dates when the order carries them, 7-day steps from the flight
    /// start otherwise. A row whose spot-cell count disagrees with the
    /// printed week columns is malformed — truncating either side would
    /// drop spots behind a success result.
    fn week_series(
        &self,
        counts: &[u32],
        order: &ExtractedOrder,
    ) -> Result<Vec<WeekCount>, RowError> {
        match &order.week_starts {
            Some(starts) => {
                if counts.len() != starts.len() {
                    return Err(RowError::MalformedRow {
                        role: ColumnRole::Spots,
                        text: format!(
                            "{} spot counts for {} week columns",
                            counts.len(),
                            starts.len()
                        ),
                    });
                }
                Ok(starts
                    .iter()
                    .zip(counts)
                    .map(|(&week_start, &count)| WeekCount::new(week_start, count))
                    .collect())
            }
            None => Ok(weeks_from_flight(order.flight_start, counts)),
        }
    }

    /// Consolidate one parsed spec into its final schedule lines.
    fn consolidate_spec(
        &self,
        spec: &ParsedLineSpec,
        order: &ExtractedOrder,
    ) -> Vec<ConsolidatedLine> {
        let rate = effective_rate(spec.net_rate, self.profile.gross_up_factor);

        let block_prefixes =
            match resolve_block_prefixes(&spec.language, order.south_asian_choice) {
                BlockResolution::Resolved(prefixes) => prefixes,
                // Gated earlier in process(); unreachable by construction,
                // but an empty set is the safe rendering.
                BlockResolution::PendingDisambiguation => Vec::new(),
            };

        let description = format!("{} {} {}", spec.language, spec.days.label(), spec.time.label());

        consolidate(&spec.weekly, order.flight_end)
            .into_iter()
            .map(|run| {
                let total_spots = run.total_spots();
                ConsolidatedLine {
                    start_date: run.start_date,
                    end_date: run.end_date,
                    days: spec.days.clone(),
                    time: spec.time,
                    weekly_spots: run.weekly_spots,
                    weeks: run.weeks,
                    total_spots,
                    rate,
                    is_bonus: is_bonus(rate, total_spots),
                    max_daily_run: max_daily_run(run.weekly_spots, spec.active_day_count),
                    block_prefixes: block_prefixes.clone(),
                    description: description.clone(),
                    separation_minutes: self.profile.separation_minutes,
                }
            })
            .collect()
    }
}
