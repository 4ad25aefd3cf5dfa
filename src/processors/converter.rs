use crate::error::{ProcessingError, Result};
use crate::models::{
    Cell, ConversionMode, ConversionResult, ConversionSummary, ConvertOptions, Table, UtmZone,
};
use crate::processors::coordinate_parser::{filter_valid_rows, parse_coordinates, ValidRows};
use crate::transform::{Proj4rsProvider, ProjectionError, TransformProvider, TransformerCache};
use crate::utils::constants::{COL_EPSG, COL_X, COL_Y, COL_ZONE};
use crate::utils::coordinates::round_to;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ProjectedPoint {
    x: f64,
    y: f64,
    zone: UtmZone,
}

/// Converts latitude/longitude columns of a table to ETRS89 / UTM.
///
/// Owns the transform-handle cache, so repeated conversions through the same
/// converter reuse handles for every CRS pair already seen.
pub struct CoordinateConverter {
    cache: TransformerCache,
}

impl CoordinateConverter {
    /// Converter backed by the proj4rs provider.
    pub fn new() -> Self {
        Self::with_provider(Proj4rsProvider::new())
    }

    pub fn with_provider(provider: impl TransformProvider + 'static) -> Self {
        Self::with_cache(TransformerCache::new(provider))
    }

    pub fn with_cache(cache: TransformerCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &TransformerCache {
        &self.cache
    }

    /// Convert a table, returning surviving rows with X/Y/EPSG/zone columns.
    ///
    /// Rows whose coordinates do not parse or fall out of range are dropped.
    /// In auto mode a zone group whose transform fails is dropped too; the
    /// request only fails when every group fails. In force_31n and fixed
    /// modes a transform failure aborts the request.
    pub fn convert(
        &self,
        table: &Table,
        lat_column: &str,
        lon_column: &str,
        mode: ConversionMode,
        options: &ConvertOptions,
    ) -> Result<ConversionResult> {
        options.validate()?;
        let lat_index = table.require_column(lat_column)?;
        let lon_index = table.require_column(lon_column)?;
        let single_zone = match mode {
            ConversionMode::Force31N => Some(UtmZone::Z31),
            ConversionMode::Fixed => Some(Self::resolve_fixed_zone(options)?),
            ConversionMode::Auto => None,
        };

        info!(
            "Converting {} rows ({} / {}) with mode {} from {}",
            table.len(),
            lat_column,
            lon_column,
            mode,
            options.input_crs
        );

        let latitudes = parse_coordinates(table.column(lat_index), options.use_decimal_comma);
        let longitudes = parse_coordinates(table.column(lon_index), options.use_decimal_comma);
        let valid = filter_valid_rows(&latitudes, &longitudes)?;
        debug!(
            "{} rows in range, {} dropped by the range filter",
            valid.n_valid, valid.n_drop
        );

        let points = match single_zone {
            Some(zone) => self.project_single(zone, &valid, options)?,
            None => self.project_by_zone(&valid, options)?,
        };

        let result = Self::assemble(table, &valid, &points, mode, options)?;
        info!("{}", result.summary.summary().replace('\n', " "));
        Ok(result)
    }

    fn resolve_fixed_zone(options: &ConvertOptions) -> Result<UtmZone> {
        let zone = options.fixed_zone.ok_or(ProcessingError::MissingFixedZone)?;
        UtmZone::new(zone)
    }

    /// One batched call for every valid row; failure aborts.
    fn project_single(
        &self,
        zone: UtmZone,
        valid: &ValidRows,
        options: &ConvertOptions,
    ) -> Result<Vec<Option<ProjectedPoint>>> {
        let target = zone.epsg_code();
        let (xs, ys) = self.cache.transform(
            &options.input_crs,
            &target,
            &valid.longitudes,
            &valid.latitudes,
        )?;

        Ok(xs
            .into_iter()
            .zip(ys)
            .map(|(x, y)| Some(ProjectedPoint { x, y, zone }))
            .collect())
    }

    /// One batched call per zone group; failed groups leave `None` entries.
    fn project_by_zone(
        &self,
        valid: &ValidRows,
        options: &ConvertOptions,
    ) -> Result<Vec<Option<ProjectedPoint>>> {
        let mut groups: BTreeMap<UtmZone, Vec<usize>> = BTreeMap::new();
        for (position, &lon) in valid.longitudes.iter().enumerate() {
            groups
                .entry(UtmZone::from_longitude(lon))
                .or_default()
                .push(position);
        }

        let mut points: Vec<Option<ProjectedPoint>> = vec![None; valid.n_valid];
        let mut last_error: Option<ProjectionError> = None;

        for (zone, positions) in &groups {
            let target = zone.epsg_code();
            let lons: Vec<f64> = positions.iter().map(|&p| valid.longitudes[p]).collect();
            let lats: Vec<f64> = positions.iter().map(|&p| valid.latitudes[p]).collect();
            debug!("Zone {}: {} rows -> {}", zone, positions.len(), target);

            match self.cache.transform(&options.input_crs, &target, &lons, &lats) {
                Ok((xs, ys)) => {
                    for ((&position, x), y) in positions.iter().zip(xs).zip(ys) {
                        points[position] = Some(ProjectedPoint { x, y, zone: *zone });
                    }
                }
                Err(e) => {
                    warn!(
                        "Dropping {} rows in zone {}: transformation failed: {}",
                        positions.len(),
                        zone,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        if points.iter().all(Option::is_none) {
            if let Some(source) = last_error {
                return Err(ProcessingError::AllRowsFailed { source });
            }
        }
        Ok(points)
    }

    fn assemble(
        table: &Table,
        valid: &ValidRows,
        points: &[Option<ProjectedPoint>],
        mode: ConversionMode,
        options: &ConvertOptions,
    ) -> Result<ConversionResult> {
        let decimals = options.round_decimals;
        let mut indices = Vec::with_capacity(points.len());
        let mut xs = Vec::with_capacity(points.len());
        let mut ys = Vec::with_capacity(points.len());
        let mut codes = Vec::with_capacity(points.len());
        let mut zones = Vec::with_capacity(points.len());
        let mut per_zone: BTreeMap<UtmZone, usize> = BTreeMap::new();

        for (position, point) in points.iter().enumerate() {
            if let Some(point) = point {
                indices.push(valid.indices[position]);
                xs.push(Cell::Float(round_to(point.x, decimals)));
                ys.push(Cell::Float(round_to(point.y, decimals)));
                codes.push(Cell::Text(point.zone.epsg_code()));
                zones.push(Cell::Int(point.zone.number() as i64));
                *per_zone.entry(point.zone).or_default() += 1;
            }
        }

        let mut output = table.select_rows(&indices);
        output.append_column(COL_X, xs)?;
        output.append_column(COL_Y, ys)?;
        output.append_column(COL_EPSG, codes)?;
        output.append_column(COL_ZONE, zones)?;

        let failed = valid.n_valid - indices.len();
        let n_valid = indices.len();
        let n_drop = valid.n_drop + failed;

        let destination_crs = per_zone.keys().map(UtmZone::epsg_code).collect();
        let zone_counts = per_zone
            .into_iter()
            .map(|(zone, count)| (zone.number(), count))
            .collect();

        let summary = ConversionSummary {
            mode,
            input_crs: options.input_crs.clone(),
            total_rows: table.len(),
            n_valid,
            n_drop,
            dropped_out_of_range: valid.n_drop,
            dropped_transform_failed: failed,
            zone_counts,
            destination_crs,
        };

        Ok(ConversionResult {
            table: output,
            n_valid,
            n_drop,
            summary,
        })
    }
}

impl Default for CoordinateConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// One-off conversion with a fresh proj4rs-backed converter.
///
/// Prefer keeping a [`CoordinateConverter`] around when converting several
/// tables so transform handles are reused.
pub fn convert_table(
    table: &Table,
    lat_column: &str,
    lon_column: &str,
    mode: ConversionMode,
    options: &ConvertOptions,
) -> Result<ConversionResult> {
    CoordinateConverter::new().convert(table, lat_column, lon_column, mode, options)
}
