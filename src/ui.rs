//! Terminal monitor frontend
//!
//! ratatui rendering of the bedside monitor: waveform strip with reference
//! grid and glow trace, vitals readout boxes, rhythm banner with alarm
//! coloring. The render loop draws into a retained display list
//! (`TermSurface`) through the `Surface` trait; the UI task paints that
//! list into a braille canvas each refresh.

use crate::monitor::{trace_color, MonitorConfig, MonitorEngine};
use crate::render_loop::SharedSurface;
use crate::scenario::{spawn_scenario_task, Scenario};
use crate::surface::{Rgb, Surface};
use crate::trace_buffer::WaveformPoint;
use crate::vitals::DisplayedVitals;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders, Paragraph,
    },
    Frame, Terminal,
};
use std::cell::RefCell;
use std::error::Error;
use std::io;
use std::rc::Rc;
use std::time::Duration;

/// One retained line segment.
#[derive(Debug, Clone, Copy)]
struct Segment {
    a: WaveformPoint,
    b: WaveformPoint,
    color: Rgb,
}

/// Retained display list behind the `Surface` trait. The render task
/// mutates it; the UI task paints it.
pub struct TermSurface {
    width: f32,
    height: f32,
    grid: Vec<Segment>,
    trace: Vec<Segment>,
}

impl TermSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            grid: Vec::new(),
            trace: Vec::new(),
        }
    }
}

impl Surface for TermSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.grid.clear();
        self.trace.clear();
    }

    fn draw_line(&mut self, a: WaveformPoint, b: WaveformPoint, color: Rgb) {
        self.grid.push(Segment { a, b, color });
    }

    fn stroke_trace(&mut self, segments: &[(WaveformPoint, WaveformPoint)], color: Rgb) {
        self.trace
            .extend(segments.iter().map(|(a, b)| Segment { a: *a, b: *b, color }));
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Dimmed variant of the trace color, drawn around the main line as a halo.
fn glow_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0 / 3, rgb.1 / 3, rgb.2 / 3)
}

/// Run the full terminal monitor until the user quits (q / Esc / Ctrl-C).
/// Must be called inside a `LocalSet` on a current-thread runtime.
pub async fn run_tui(config: MonitorConfig, scenario: Scenario) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = monitor_loop(&mut terminal, config, scenario).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn monitor_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: MonitorConfig,
    scenario: Scenario,
) -> Result<(), Box<dyn Error>> {
    let surface: SharedSurface<TermSurface> = Rc::new(RefCell::new(None));
    let engine = Rc::new(RefCell::new(MonitorEngine::new(
        config,
        Rc::clone(&surface),
        scenario.initial_vitals(),
    )));
    let case_name = scenario.name.clone();
    engine.borrow_mut().start();
    let jitter_task = crate::monitor::spawn_jitter_task(Rc::clone(&engine));
    let scenario_task = spawn_scenario_task(Rc::clone(&engine), scenario);

    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / config.fps.max(1.0)));
    'outer: loop {
        ticker.tick().await;

        terminal.draw(|frame| {
            let area = frame.size();
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1),
                    Constraint::Min(8),
                    Constraint::Length(4),
                    Constraint::Length(1),
                ])
                .split(area);

            // Size the logical surface to the waveform rect in braille
            // dots (2 per cell wide, 4 per cell tall).
            let wave_area = rows[1];
            let px_w = (wave_area.width.max(1) as f32) * 2.0;
            let px_h = (wave_area.height.max(1) as f32) * 4.0;
            engine.borrow_mut().set_surface_size(px_w, px_h);
            {
                let mut slot = surface.borrow_mut();
                let stale = slot
                    .as_ref()
                    .map(|s| s.size() != (px_w, px_h))
                    .unwrap_or(true);
                if stale {
                    *slot = Some(TermSurface::new(px_w, px_h));
                }
            }

            let displayed = engine.borrow().displayed();
            draw_header(frame, rows[0], &case_name);
            draw_waveform(frame, wave_area, &surface.borrow(), &displayed);
            draw_vitals_row(frame, rows[2], &displayed);
            draw_footer(frame, rows[3], &displayed);
        })?;

        while event::poll(Duration::ZERO)? {
            if let Event::Key(KeyEvent {
                code, modifiers, ..
            }) = event::read()?
            {
                let quit = matches!(code, KeyCode::Char('q') | KeyCode::Esc)
                    || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL));
                if quit {
                    break 'outer;
                }
            }
        }
    }

    jitter_task.abort();
    scenario_task.abort();
    engine.borrow_mut().shutdown();
    Ok(())
}

fn draw_header(frame: &mut Frame, area: Rect, case_name: &str) {
    let header = Line::from(vec![
        Span::styled(
            " BEDSIDE MONITOR — BED 04 ",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(case_name, Style::default().fg(Color::DarkGray)),
        Span::styled("  25mm/s ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            " LIVE ",
            Style::default()
                .fg(to_color(Rgb::EMERALD))
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn draw_waveform(
    frame: &mut Frame,
    area: Rect,
    surface: &Option<TermSurface>,
    displayed: &DisplayedVitals,
) {
    let title = format!(" Lead II — {} BPM ", displayed.heart_rate_bpm());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default().fg(to_color(Rgb::EMERALD)),
        ));

    let Some(surface) = surface.as_ref() else {
        frame.render_widget(block, area);
        return;
    };
    let (w, h) = surface.size();
    let canvas = Canvas::default()
        .block(block)
        .marker(symbols::Marker::Braille)
        .x_bounds([0.0, w as f64])
        .y_bounds([0.0, h as f64])
        .paint(|ctx| {
            for seg in &surface.grid {
                ctx.draw(&CanvasLine {
                    x1: seg.a.x as f64,
                    y1: (h - seg.a.y) as f64,
                    x2: seg.b.x as f64,
                    y2: (h - seg.b.y) as f64,
                    color: to_color(seg.color),
                });
            }
            // Halo pass first, one dot above and below the trace.
            for seg in &surface.trace {
                for dy in [-1.0f32, 1.0] {
                    ctx.draw(&CanvasLine {
                        x1: seg.a.x as f64,
                        y1: (h - seg.a.y + dy) as f64,
                        x2: seg.b.x as f64,
                        y2: (h - seg.b.y + dy) as f64,
                        color: glow_color(seg.color),
                    });
                }
            }
            for seg in &surface.trace {
                ctx.draw(&CanvasLine {
                    x1: seg.a.x as f64,
                    y1: (h - seg.a.y) as f64,
                    x2: seg.b.x as f64,
                    y2: (h - seg.b.y) as f64,
                    color: to_color(seg.color),
                });
            }
        });
    frame.render_widget(canvas, area);
}

fn draw_vitals_row(frame: &mut Frame, area: Rect, d: &DisplayedVitals) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
        ])
        .split(area);

    let hr = d.heart_rate_bpm();
    let hr_color = to_color(trace_color(hr));
    vital_box(frame, cols[0], "ECG/HR", &hr.to_string(), "bpm", hr_color);

    let bp_color = if d.systolic_bp < 95 || d.systolic_bp > 160 {
        to_color(Rgb::RED)
    } else {
        to_color(Rgb::YELLOW)
    };
    let nibp = format!("{}/{}", d.systolic_bp, d.diastolic_bp);
    let map = format!("MAP {}", d.mean_arterial_pressure());
    vital_box(frame, cols[1], "NIBP", &nibp, &map, bp_color);

    let o2 = d.oxygen_sat_pct();
    let o2_color = if o2 < 93 {
        to_color(Rgb::RED)
    } else {
        to_color(Rgb::BLUE)
    };
    vital_box(frame, cols[2], "SpO2", &o2.to_string(), "%", o2_color);

    vital_box(
        frame,
        cols[3],
        "Resp",
        &d.resp_rate_brpm().to_string(),
        "brpm",
        to_color(Rgb::CYAN),
    );
    vital_box(
        frame,
        cols[4],
        "Temp",
        &format!("{:.1}", d.temperature_c()),
        "°C",
        to_color(Rgb::EMERALD),
    );
}

fn vital_box(frame: &mut Frame, area: Rect, label: &str, value: &str, unit: &str, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(label, Style::default().fg(color)));
    let body = Line::from(vec![
        Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(unit, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(
        Paragraph::new(body).block(block).alignment(Alignment::Center),
        area,
    );
}

fn draw_footer(frame: &mut Frame, area: Rect, d: &DisplayedVitals) {
    let hr = d.heart_rate_bpm();
    let rhythm_color = to_color(trace_color(hr));
    let footer = Line::from(vec![
        Span::styled(
            " ALARMS: ACTIVE ",
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("  {}  ", d.rhythm),
            Style::default()
                .fg(rhythm_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("(q to quit)", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(footer).alignment(Alignment::Right), area);
}
