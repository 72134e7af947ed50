use crate::types::{DaySet, TimeRange};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

// Default value functions for serde
fn default_separation() -> u32 {
    15
}

fn default_ros_days() -> String {
    "M-Su".to_string()
}

fn default_ros_time() -> String {
    "6a-11:59p".to_string()
}

fn default_true() -> bool {
    true
}

/// Which agency format an order came from. One parser serves all of them;
/// the profile parameterizes the differences.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// Annual-buy cable orders: no explicit week columns, weeks derive
    /// from the flight start.
    AnnualBuy,
    /// Agency orders billed gross from printed net rates.
    NetRateAgency,
    /// Orders using compact weekday runs ("MTuWThF") and per-week columns.
    CompactDay,
    Generic,
}

/// Per-source parsing and rule parameters. Loaded once per order, never
/// mutated by the engine. One profile value replaces the per-agency parser
/// copies the source systems carried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceProfile {
    pub source: SourceKind,

    /// Gross rate = net / factor. None means rates are already gross.
    #[serde(default)]
    pub gross_up_factor: Option<f64>,

    /// Minimum minutes between airings, passed through to each output line.
    #[serde(default = "default_separation")]
    pub separation_minutes: u32,

    /// Run-of-schedule fallback window for lines with no printed schedule.
    #[serde(default = "default_ros_days")]
    pub ros_days: String,
    #[serde(default = "default_ros_time")]
    pub ros_time: String,

    /// When the source prints weekly counts without week-date columns,
    /// week starts derive from the flight start in 7-day steps.
    #[serde(default = "default_true")]
    pub weeks_from_flight: bool,
}

impl SourceProfile {
    /// Parsed ROS day set. Profile values are trusted config, but a broken
    /// override still falls back to the full week rather than panicking.
    pub fn ros_day_set(&self) -> DaySet {
        crate::parser::parse_day_pattern(&self.ros_days).unwrap_or_else(|_| DaySet::full_week())
    }

    pub fn ros_time_range(&self) -> TimeRange {
        crate::parser::TimeRangeParser::new()
            .parse(&self.ros_time)
            .unwrap_or(TimeRange::new(6 * 60, 23 * 60 + 59))
    }

    /// Load a profile from a YAML file (functional approach).
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let profile: SourceProfile = serde_yaml::from_str(&content)?;
        Ok(profile)
    }
}

impl Default for SourceProfile {
    fn default() -> Self {
        Self {
            source: SourceKind::Generic,
            gross_up_factor: None,
            separation_minutes: default_separation(),
            ros_days: default_ros_days(),
            ros_time: default_ros_time(),
            weeks_from_flight: true,
        }
    }
}

/// Holds builtin profiles per source kind, with file override. Profiles
/// are read-only for the engine's lifetime.
#[derive(Debug, Clone)]
pub struct ProfileManager {
    profiles: HashMap<SourceKind, SourceProfile>,
    default_profile: SourceProfile,
}

impl ProfileManager {
    pub fn new() -> Self {
        let mut manager = Self {
            profiles: HashMap::new(),
            default_profile: SourceProfile::default(),
        };
        manager.load_builtin_profiles();
        manager
    }

    pub fn get(&self, source: &SourceKind) -> &SourceProfile {
        self.profiles.get(source).unwrap_or(&self.default_profile)
    }

    pub fn load_profile_from_file(&mut self, path: &str) -> Result<()> {
        let profile = SourceProfile::load_from_file(path)?;
        self.profiles.insert(profile.source.clone(), profile);
        Ok(())
    }

    fn load_builtin_profiles(&mut self) {
        self.profiles
            .insert(SourceKind::Generic, SourceProfile::default());

        // Annual cable buys: weeks always derive from the flight window.
        self.profiles.insert(
            SourceKind::AnnualBuy,
            SourceProfile {
                source: SourceKind::AnnualBuy,
                gross_up_factor: None,
                weeks_from_flight: true,
                ..SourceProfile::default()
            },
        );

        // Net-rate agencies bill at the standard 15% commission factor.
        self.profiles.insert(
            SourceKind::NetRateAgency,
            SourceProfile {
                source: SourceKind::NetRateAgency,
                gross_up_factor: Some(0.85),
                ..SourceProfile::default()
            },
        );

        // Compact-day formats print explicit week columns.
        self.profiles.insert(
            SourceKind::CompactDay,
            SourceProfile {
                source: SourceKind::CompactDay,
                gross_up_factor: None,
                weeks_from_flight: false,
                ..SourceProfile::default()
            },
        );
    }
}

impl Default for ProfileManager {
    fn default() -> Self {
        Self::new()
    }
}
