//! Style reconciliation
//!
//! Converges whatever base style the engine loaded to the India overlay:
//! the boundary source, the filled boundary layer and its borders, an
//! optional mask, a white background, and every other layer hidden.
//! Layers are hidden rather than removed so the base style can be
//! re-enabled later. Each step checks current state before mutating, so
//! running the pass again changes nothing.

use serde_json::{json, Value};

use crate::{
    core::{config::ReconcileOptions, constants::*},
    data::geojson::BoundaryFeatureCollection,
    layers::base::{LayerDescriptor, LayerKind, Visibility},
    style::{
        document::{SourceDefinition, StyleDocument},
        expression::Expression,
    },
    traits::StyleApi,
    MapError, Result,
};

/// What happened to the background during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackgroundChange {
    /// The first background layer already had the target colour.
    #[default]
    Unchanged,
    /// The first background layer, by its own id, was recoloured.
    Recolored(String),
    /// No background layer existed; one was appended under this id.
    Appended(String),
}

/// Mutations applied by one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub added_sources: Vec<String>,
    pub added_layers: Vec<String>,
    pub background: BackgroundChange,
    pub shown: Vec<String>,
    pub hidden: Vec<String>,
}

impl ReconcileReport {
    pub fn mutation_count(&self) -> usize {
        let background = match self.background {
            BackgroundChange::Unchanged => 0,
            _ => 1,
        };
        self.added_sources.len()
            + self.added_layers.len()
            + background
            + self.shown.len()
            + self.hidden.len()
    }

    pub fn is_noop(&self) -> bool {
        self.mutation_count() == 0
    }
}

/// Filled state boundaries over the `india` source.
pub fn boundary_fill_layer() -> LayerDescriptor {
    LayerDescriptor::new(INDIA_LAYER_ID, LayerKind::Fill)
        .with_source(INDIA_SOURCE_ID)
        .with_paint("fill-color", INDIA_FILL_COLOR)
        .with_paint("fill-opacity", INDIA_FILL_OPACITY)
}

/// State border lines. Line layers draw every geometry in the source, so
/// the filter keeps them to polygon outlines.
pub fn state_border_layer() -> LayerDescriptor {
    LayerDescriptor::new(STATE_BORDERS_LAYER_ID, LayerKind::Line)
        .with_source(INDIA_SOURCE_ID)
        .with_paint("line-color", BORDER_LINE_COLOR)
        .with_paint("line-width", BORDER_LINE_WIDTH)
        .with_filter(Expression::polygons_only())
}

/// Grey mask over every country except India. Deliberately unbound: it
/// relies on a world-features source with `iso_3166_1_alpha_3` tags.
pub fn mask_layer() -> LayerDescriptor {
    LayerDescriptor::new(MASK_LAYER_ID, LayerKind::Fill)
        .with_paint("fill-color", MASK_FILL_COLOR)
        .with_filter(Expression::exclude_india())
}

/// Whether a layer stays visible after the sweep. The allow-list is keyed
/// by kind first, so a symbol layer named `india-layer` is still hidden.
pub fn is_overlay_layer(kind: &LayerKind, id: &str) -> bool {
    match kind {
        LayerKind::Fill => id == INDIA_LAYER_ID,
        LayerKind::Line => id == STATE_BORDERS_LAYER_ID,
        _ => false,
    }
}

/// First layer of kind background in render order, if any.
pub fn first_background_layer(style: &StyleDocument) -> Option<&LayerDescriptor> {
    style
        .layers()
        .iter()
        .find(|layer| layer.kind == LayerKind::Background)
}

/// Runs the reconciliation pass against `api`.
///
/// A `SourceConflict` aborts the pass; mutations made before it are kept.
pub fn reconcile<S>(
    api: &mut S,
    boundaries: &BoundaryFeatureCollection,
    options: &ReconcileOptions,
) -> Result<ReconcileReport>
where
    S: StyleApi + ?Sized,
{
    let mut report = ReconcileReport::default();

    ensure_boundary_source(api, boundaries, &mut report)?;
    ensure_layer(api, boundary_fill_layer(), &mut report)?;
    ensure_layer(api, state_border_layer(), &mut report)?;
    if options.mask {
        ensure_layer(api, mask_layer(), &mut report)?;
        warn_if_mask_unbacked(api.style()?);
    }
    normalize_background(api, &mut report)?;
    sweep_visibility(api, &mut report)?;

    log::info!(
        "style reconciled: {} source(s) and {} layer(s) added, {} shown, {} hidden",
        report.added_sources.len(),
        report.added_layers.len(),
        report.shown.len(),
        report.hidden.len()
    );
    Ok(report)
}

fn ensure_boundary_source<S: StyleApi + ?Sized>(
    api: &mut S,
    boundaries: &BoundaryFeatureCollection,
    report: &mut ReconcileReport,
) -> Result<()> {
    let desired = SourceDefinition::geojson(boundaries.to_value()?);

    match api.style()?.source(INDIA_SOURCE_ID) {
        Some(existing) if existing.is_geojson() && existing.data == desired.data => Ok(()),
        Some(existing) => {
            log::error!(
                "source '{}' already registered as {} with different data",
                INDIA_SOURCE_ID,
                existing.kind
            );
            Err(MapError::SourceConflict {
                id: INDIA_SOURCE_ID.to_string(),
            }
            .into())
        }
        None => {
            api.add_source(INDIA_SOURCE_ID, desired)?;
            log::debug!(
                "added source '{}' with {} boundary feature(s)",
                INDIA_SOURCE_ID,
                boundaries.len()
            );
            report.added_sources.push(INDIA_SOURCE_ID.to_string());
            Ok(())
        }
    }
}

fn ensure_layer<S: StyleApi + ?Sized>(
    api: &mut S,
    layer: LayerDescriptor,
    report: &mut ReconcileReport,
) -> Result<()> {
    if api.style()?.layer(&layer.id).is_some() {
        return Ok(());
    }
    let id = layer.id.clone();
    log::debug!("adding {} layer '{}'", layer.kind, id);
    api.add_layer(layer)?;
    report.added_layers.push(id);
    Ok(())
}

fn warn_if_mask_unbacked(style: &StyleDocument) {
    let backed = style
        .sources()
        .values()
        .any(|source| source.may_provide_property(ISO_ALPHA3_PROPERTY));
    if !backed {
        log::warn!(
            "mask layer added but no source provides '{}'; the mask will not render",
            ISO_ALPHA3_PROPERTY
        );
    }
}

fn normalize_background<S: StyleApi + ?Sized>(
    api: &mut S,
    report: &mut ReconcileReport,
) -> Result<()> {
    let target = Value::from(BACKGROUND_COLOR);
    let existing = first_background_layer(api.style()?)
        .map(|layer| (layer.id.clone(), layer.paint_property("background-color").cloned()));

    match existing {
        Some((_, Some(color))) if color == target => {}
        Some((id, _)) => {
            api.set_paint_property(&id, "background-color", target)?;
            log::debug!("recoloured background layer '{}'", id);
            report.background = BackgroundChange::Recolored(id);
        }
        None => {
            let id = unused_layer_id(api.style()?, BACKGROUND_LAYER_ID);
            api.add_layer(
                LayerDescriptor::new(id.as_str(), LayerKind::Background)
                    .with_paint("background-color", json!(BACKGROUND_COLOR)),
            )?;
            log::debug!("appended background layer '{}'", id);
            report.background = BackgroundChange::Appended(id);
        }
    }
    Ok(())
}

/// `base` if no layer uses it, otherwise the first free `base-N`.
fn unused_layer_id(style: &StyleDocument, base: &str) -> String {
    if style.layer(base).is_none() {
        return base.to_string();
    }
    let mut n = 1;
    loop {
        let id = format!("{}-{}", base, n);
        if style.layer(&id).is_none() {
            return id;
        }
        n += 1;
    }
}

fn sweep_visibility<S: StyleApi + ?Sized>(
    api: &mut S,
    report: &mut ReconcileReport,
) -> Result<()> {
    // Snapshot first: the sweep must see the layers added above, and the
    // mutations below need the style mutably.
    let changes: Vec<(String, Visibility)> = api
        .style()?
        .layers()
        .iter()
        .filter_map(|layer| {
            let wanted = Visibility::from(is_overlay_layer(&layer.kind, &layer.id));
            (layer.visibility() != wanted).then(|| (layer.id.clone(), wanted))
        })
        .collect();

    for (id, visibility) in changes {
        api.set_visibility(&id, visibility)?;
        match visibility {
            Visibility::Visible => report.shown.push(id),
            Visibility::None => report.hidden.push(id),
        }
    }
    Ok(())
}
