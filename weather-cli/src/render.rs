use weather_core::{Renderer, UiState, ViewHandles};

/// Prints the view to the terminal after each transition.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn render(&mut self, view: &ViewHandles) {
        match view.state() {
            UiState::Idle => {}
            UiState::Loading => println!("{}", view.loading.text),
            UiState::Error => eprintln!("Error: {}", view.error.text),
            UiState::Result => {
                let w = &view.weather;
                println!();
                println!("  {}", w.city_name);
                println!("  {}  {}", w.temperature, w.description);
                println!("  Wind:     {}", w.wind_speed);
                println!("  Humidity: {}", w.humidity);
                println!("  Icon:     {}", w.icon.src);
                println!();
            }
        }
    }
}
