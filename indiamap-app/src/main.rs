use anyhow::{anyhow, Context};
use indiamap::{
    BoundaryFeatureCollection, ChannelSink, HeadlessFactory, LatLng, MapViewBuilder, MountPoint,
    StyleApi, StyleDocument, StyleSource,
};

/// Base style with a background, water and labels, standing in for a
/// tile provider's style.
const BUILTIN_STYLE: &str = r##"{
    "version": 8,
    "name": "indiamap-demo",
    "sources": {},
    "layers": [
        {"id": "land", "type": "background", "paint": {"background-color": "#f2efe9"}},
        {"id": "water", "type": "background", "paint": {"background-color": "#aad3df"}}
    ]
}"##;

/// Two coarse state outlines.
const BUILTIN_BOUNDARIES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "properties": {"name": "Karnataka", "iso_3166_1_alpha_3": "IND"},
            "geometry": {"type": "Polygon", "coordinates": [[
                [74.0, 12.0], [78.5, 12.0], [78.5, 18.4], [74.0, 18.4], [74.0, 12.0]
            ]]}
        },
        {
            "type": "Feature",
            "properties": {"name": "Delhi", "iso_3166_1_alpha_3": "IND"},
            "geometry": {"type": "Polygon", "coordinates": [[
                [76.8, 28.4], [77.3, 28.4], [77.3, 28.9], [76.8, 28.9], [76.8, 28.4]
            ]]}
        }
    ]
}"#;

fn lift<T>(result: indiamap::Result<T>) -> anyhow::Result<T> {
    result.map_err(|e| anyhow!(e))
}

fn main() -> anyhow::Result<()> {
    indiamap::init_logging();

    let mut args = std::env::args().skip(1);
    let style = match args.next() {
        Some(path) => lift(StyleDocument::from_path(&path)).with_context(|| format!("reading style {}", path))?,
        None => lift(StyleDocument::from_json_str(BUILTIN_STYLE))?,
    };
    let boundaries = match args.next() {
        Some(path) => {
            lift(BoundaryFeatureCollection::from_path(&path)).with_context(|| format!("reading boundaries {}", path))?
        }
        None => lift(BoundaryFeatureCollection::from_str(BUILTIN_BOUNDARIES))?,
    };
    log::info!("loaded {} boundary feature(s)", boundaries.len());

    let factory = HeadlessFactory::new();
    let (sink, clicks) = ChannelSink::bounded(16);
    let mut view = lift(
        MapViewBuilder::new()
            .with_style(StyleSource::Inline(Box::new(style)))
            .with_boundaries(boundaries)
            .with_sink(sink)
            .mount(Some(&MountPoint::new("map").with_size(1200, 800)), &factory),
    )?;

    let surface = view.surface_mut().context("surface released early")?;
    lift(surface.complete_style_load())?;
    surface.click(LatLng::from_lng_lat(77.5946, 12.9716));
    lift(view.process_events())?;

    if let Some(report) = view.last_report() {
        log::info!(
            "reconciled with {} mutation(s): {} layer(s) hidden",
            report.mutation_count(),
            report.hidden.len()
        );
    }
    for lat_lng in clicks.try_iter() {
        log::info!("recorded click at {}", lat_lng);
    }

    let surface = view.surface().context("surface released early")?;
    println!("{}", lift(lift(surface.style())?.to_json_pretty())?);
    for marker in surface.markers() {
        if let Some(popup) = marker.popup() {
            println!("{} {} {}", marker.id(), marker.position(), popup.html());
        }
    }

    view.unmount();
    Ok(())
}
