use anyhow::{Context, Result};
use skydeck_core::Config;
use skydeck_dashboard::{Dashboard, FileStore, KeyValueStore};
use skydeck_weather::{CityWeather, WeatherProvider, WeatherSource};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  search <city>              look up a city and display it
  fav <city>                 toggle favorite for a displayed or favorite city
  rm <city>                  remove a city from the display and favorites
  only-favorites [on|off]    show favorites only (no argument flips)
  theme                      switch between light and dark
  list                       show the current view
  help                       show this message
  quit                       exit";

#[derive(Debug, PartialEq)]
enum Command<'a> {
    Search(&'a str),
    Favorite(&'a str),
    Remove(&'a str),
    OnlyFavorites(Option<bool>),
    Theme,
    List,
    Help,
    Quit,
    Empty,
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb {
            "" => Command::Empty,
            "search" | "s" => Command::Search(rest),
            "fav" | "f" => Command::Favorite(rest),
            "rm" => Command::Remove(rest),
            "only-favorites" => match rest {
                "" => Command::OnlyFavorites(None),
                "on" => Command::OnlyFavorites(Some(true)),
                "off" => Command::OnlyFavorites(Some(false)),
                _ => Command::Unknown(line),
            },
            "theme" => Command::Theme,
            "list" | "ls" => Command::List,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => Command::Unknown(line),
        }
    }
}

fn print_city(city: &CityWeather, favorite: bool) {
    let star = if favorite { "*" } else { " " };
    println!(
        "{} {}, {}  {}°C (feels like {}°C)  {}",
        star, city.city, city.country, city.temperature, city.feels_like, city.description
    );
    if let Some(icon) = city.icon_url() {
        println!("    icon: {}", icon);
    }
    println!(
        "    humidity {}%  wind {:.1} m/s  visibility {:.1} km  pressure {} hPa",
        city.humidity, city.wind_speed, city.visibility, city.pressure
    );
    if !city.forecast.is_empty() {
        let strip: Vec<String> = city
            .forecast
            .iter()
            .map(|day| format!("{} {}°C {}", day.date.format("%a"), day.temp, day.condition))
            .collect();
        println!("    {}", strip.join(" | "));
    }
}

fn print_view<S: WeatherSource, K: KeyValueStore>(dashboard: &Dashboard<S, K>) {
    let cities = dashboard.visible_cities();
    let mode = if dashboard.only_favorites() {
        "favorites"
    } else {
        "search"
    };
    let theme = if dashboard.is_dark() { "dark" } else { "light" };
    println!("[{} view, {} theme]", mode, theme);

    if cities.is_empty() {
        println!("  (nothing to show)");
    }
    for city in cities {
        print_city(city, dashboard.is_favorite(city));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    skydeck_core::init()?;

    let (config, _) = Config::load_validated()?;

    let provider =
        WeatherProvider::new(&config.weather).context("Failed to build weather client")?;
    let store = FileStore::new(&config.storage.data_dir);
    tracing::info!("Using data directory {:?}", store.dir());

    let mut dashboard = Dashboard::load(provider, store, config.ui.dark_mode).await;

    println!("SkyDeck weather dashboard. Type `help` for commands.");
    if !dashboard.favorites().is_empty() {
        dashboard.set_filter_mode(true);
        print_view(&dashboard);
        dashboard.set_filter_mode(false);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Empty => {}
            Command::Search(query) => {
                if query.is_empty() {
                    continue;
                }
                println!("Loading...");
                if dashboard.search(query).await.is_ok() {
                    print_view(&dashboard);
                } else if let Some(message) = dashboard.error_message() {
                    println!("{}", message);
                }
            }
            Command::Favorite(name) => match dashboard.find_city(name).cloned() {
                Some(city) => {
                    let now = dashboard.toggle_favorite(&city);
                    println!(
                        "{} {}",
                        city.city,
                        if now { "added to favorites" } else { "removed from favorites" }
                    );
                }
                None => println!("No displayed city named {:?}", name),
            },
            Command::Remove(name) => match dashboard.find_city(name).cloned() {
                Some(city) => {
                    dashboard.remove_city(&city);
                    println!("Removed {}", city.city);
                }
                None => println!("No displayed city named {:?}", name),
            },
            Command::OnlyFavorites(mode) => {
                let on = mode.unwrap_or(!dashboard.only_favorites());
                dashboard.set_filter_mode(on);
                print_view(&dashboard);
            }
            Command::Theme => {
                let dark = dashboard.toggle_theme();
                if let Err(e) = Config::save_dark_mode(dark) {
                    tracing::warn!("Failed to save theme: {:#}", e);
                }
                println!("Theme: {}", if dark { "dark" } else { "light" });
            }
            Command::List => print_view(&dashboard),
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
            Command::Unknown(input) => println!("Unknown command {:?}. Type `help`.", input),
        }
    }

    tracing::info!("SkyDeck shutting down");
    Ok(())
}
