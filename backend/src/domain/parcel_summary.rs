//! Aggregate statistics over the parcel register.

use std::collections::BTreeMap;

use serde::Serialize;

use super::entity::Entity;
use super::parcel::ParcelFields;

/// Collection-wide parcel statistics.
///
/// Area aggregates are rounded to two decimal places. Minimum and maximum are
/// `None` for an empty register; the mean is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParcelSummary {
    /// Number of parcels.
    pub total_terrenos: u64,
    /// Sum of areas in m².
    pub area_total_m2: f64,
    /// Mean area in m².
    pub area_media_m2: f64,
    /// Smallest area in m².
    pub area_minima_m2: Option<f64>,
    /// Largest area in m².
    pub area_maxima_m2: Option<f64>,
    /// Parcel count per lot type label.
    pub tipos_lote: BTreeMap<String, u64>,
    /// Parcel count per zone.
    pub zonas: BTreeMap<String, u64>,
}

impl ParcelSummary {
    /// Aggregate the given parcels.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::ParcelSummary;
    ///
    /// let summary = ParcelSummary::from_parcels(&[]);
    /// assert_eq!(summary.total_terrenos, 0);
    /// assert_eq!(summary.area_media_m2, 0.0);
    /// assert!(summary.area_minima_m2.is_none());
    /// ```
    pub fn from_parcels(parcels: &[Entity<ParcelFields>]) -> Self {
        let mut tipos_lote = BTreeMap::new();
        let mut zonas = BTreeMap::new();
        let mut total = 0.0_f64;
        let mut minimum: Option<f64> = None;
        let mut maximum: Option<f64> = None;

        for parcel in parcels {
            let fields = &parcel.fields;
            total += fields.area;
            minimum = Some(minimum.map_or(fields.area, |m| m.min(fields.area)));
            maximum = Some(maximum.map_or(fields.area, |m| m.max(fields.area)));
            *tipos_lote
                .entry(fields.tipo_lote.label().to_owned())
                .or_insert(0) += 1;
            *zonas.entry(fields.zona.clone()).or_insert(0) += 1;
        }

        let count = parcels.len();
        let mean = if count == 0 {
            0.0
        } else {
            total / count as f64
        };

        Self {
            total_terrenos: count as u64,
            area_total_m2: round2(total),
            area_media_m2: round2(mean),
            area_minima_m2: minimum.map(round2),
            area_maxima_m2: maximum.map(round2),
            tipos_lote,
            zonas,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
