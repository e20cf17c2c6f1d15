use std::cell::RefCell;

use treemap_core::color::{ColorScale, OrdinalScale};
use treemap_core::treemap::Rect;
use treemap_core::{
    ChartBody, DataLoadError, Fetch, Page, Pipeline, Point, Renderer, Selection, DATASETS, LOAD_FAILURE_MESSAGE,
};

/// Serves canned bodies and records which URLs were requested.
struct MockFetch {
    body: Result<String, u16>,
    requested: RefCell<Vec<String>>,
}

impl MockFetch {
    fn ok(body: &str) -> Self {
        Self { body: Ok(body.to_owned()), requested: RefCell::default() }
    }

    fn status(code: u16) -> Self {
        Self { body: Err(code), requested: RefCell::default() }
    }
}

impl Fetch for MockFetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DataLoadError> {
        self.requested.borrow_mut().push(url.to_owned());
        match &self.body {
            Ok(b) => Ok(b.clone().into_bytes()),
            Err(status) => Err(DataLoadError::Status { url: url.to_owned(), status: *status }),
        }
    }
}

fn run(key: Option<&str>, fetch: &MockFetch) -> (Page, Renderer) {
    let mut renderer: Renderer = Renderer::default();
    let page = Pipeline::new(&mut renderer, fetch).run(&Selection::parse(key));
    (page, renderer)
}

const VIDEO_GAMES: &str = r#"{
  "name": "Video Game Sales Data Top 100",
  "children": [
    {"name": "Wii", "children": [
      {"name": "Wii Sports", "category": "Wii", "value": "82.53"},
      {"name": "Mario Kart Wii", "category": "Wii", "value": "35.52"},
      {"name": "Wii Sports Resort", "category": "Wii", "value": "32.77"}
    ]},
    {"name": "NES", "children": [
      {"name": "Super Mario Bros.", "category": "NES", "value": "40.24"},
      {"name": "Duck Hunt", "category": "NES", "value": "28.31"}
    ]},
    {"name": "GB", "children": [
      {"name": "Pokemon Red/Pokemon Blue", "category": "GB", "value": "31.37"},
      {"name": "Tetris", "category": "GB", "value": "30.26"}
    ]},
    {"name": "DS", "children": [
      {"name": "New Super Mario Bros.", "category": "DS", "value": "30.01"},
      {"name": "Nintendogs", "category": "DS", "value": "24.67"},
      {"name": "Mario Kart DS", "category": "DS", "value": "23.21"},
      {"name": "Brain Age", "category": "DS", "value": "20.22"}
    ]},
    {"name": "X360", "children": [
      {"name": "Kinect Adventures!", "category": "X360", "value": "21.82"}
    ]}
  ]
}"#;

#[test]
fn movies_single_leaf_scenario() {
    let fetch = MockFetch::ok(r#"{"children":[{"name":"Action","children":[{"name":"Film A","category":"Action","value":100}]}]}"#);
    let (page, renderer) = run(Some("movies"), &fetch);

    assert_eq!(page.title, "Movie Sales");
    assert_eq!(fetch.requested.borrow().as_slice(), [DATASETS[1].url]);

    let chart = page.chart().expect("chart rendered");
    assert_eq!(chart.tiles.len(), 1);
    let tile = &chart.tiles[0];
    assert_eq!(Some(tile.fill), renderer.colors().peek("Action"));
    let want = Rect::new(2.0, 2.0, 998.0, 598.0);
    for (got, want) in [(tile.rect.x0, want.x0), (tile.rect.y0, want.y0), (tile.rect.x1, want.x1), (tile.rect.y1, want.y1)] {
        assert!((got - want).abs() < 1e-6, "{:?}", tile.rect);
    }
    assert_eq!(chart.legend.items.len(), 1);
    assert_eq!(chart.legend.items[0].category, "Action");
}

#[test]
fn http_404_shows_failure_message() {
    let fetch = MockFetch::status(404);
    let (page, renderer) = run(None, &fetch);
    assert_eq!(page.title, DATASETS[0].title);
    assert_eq!(page.description, DATASETS[0].description);
    assert_eq!(page.body, ChartBody::Failed { message: LOAD_FAILURE_MESSAGE.to_owned() });
    assert!(renderer.chart().is_none());
}

#[test]
fn malformed_json_shows_failure_message() {
    let (page, _) = run(Some("kickstarter"), &MockFetch::ok("{\"children\": ["));
    assert_eq!(page.failure(), Some(LOAD_FAILURE_MESSAGE));
    assert_eq!(page.title, "Kickstarter Pledges");
}

#[test]
fn unknown_key_loads_default_dataset() {
    let fetch = MockFetch::ok(VIDEO_GAMES);
    let (page, _) = run(Some("boardgames"), &fetch);
    assert_eq!(page.dataset.key, "videogames");
    assert_eq!(fetch.requested.borrow()[0], DATASETS[0].url);
}

#[test]
fn layout_properties_hold_on_real_shape() {
    let (page, _) = run(None, &MockFetch::ok(VIDEO_GAMES));
    let chart = page.chart().unwrap();
    assert_eq!(chart.tiles.len(), 13);

    let canvas = Rect::new(0.0, 0.0, chart.width, chart.height);
    for (i, a) in chart.tiles.iter().enumerate() {
        assert!(a.rect.width() >= 0.0 && a.rect.height() >= 0.0);
        assert!(a.rect.within(&canvas));
        for b in &chart.tiles[i + 1..] {
            assert!(!a.rect.overlaps(&b.rect), "{} overlaps {}", a.name, b.name);
        }
    }

    // Leaves come out grouped, heaviest group first, heaviest leaf first.
    assert_eq!(chart.tiles[0].name, "Wii Sports");
    assert_eq!(chart.categories, ["Wii", "DS", "NES", "GB", "X360"]);

    let mut distinct: Vec<_> = chart.tiles.iter().map(|t| t.category.clone()).collect();
    distinct.sort();
    distinct.dedup();
    let mut legend: Vec<_> = chart.legend.items.iter().map(|i| i.category.clone()).collect();
    legend.sort();
    assert_eq!(legend, distinct);
}

#[test]
fn tooltip_enter_and_leave() {
    let (page, mut renderer) = run(None, &MockFetch::ok(VIDEO_GAMES));
    let tetris = page.chart().unwrap().tiles.iter().position(|t| t.name == "Tetris").unwrap();

    renderer.pointer_enter(tetris, Point::new(300.0, 240.0));
    let tip = renderer.tooltip();
    assert!(tip.visible);
    assert_eq!(tip.position, Point::new(300.0, 240.0));
    let text = tip.content.text();
    assert!(text.contains("Name: Tetris"));
    assert!(text.contains("Category: GB"));
    assert!(text.contains("30.26"));

    renderer.pointer_leave();
    assert!(!renderer.tooltip().visible);
}

#[test]
fn custom_color_scale_plugs_in() {
    struct Mono;
    impl ColorScale for Mono {
        fn color(&mut self, _key: &str) -> treemap_core::color::Color {
            treemap_core::color::Color::BLACK
        }
    }

    let mut renderer = Renderer::with_colors(Default::default(), Mono);
    let page = Pipeline::new(&mut renderer, &MockFetch::ok(VIDEO_GAMES)).run(&Selection::parse(None));
    let chart = page.chart().unwrap();
    assert!(chart.tiles.iter().all(|t| t.fill == treemap_core::color::Color::BLACK));

    let mut ordinal = OrdinalScale::default();
    assert_ne!(ordinal.color("Wii"), treemap_core::color::Color::BLACK);
}
