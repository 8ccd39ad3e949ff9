use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;
use wordpace::{
    report::{format_label, SessionReport},
    session::SessionState,
    typing_session::{LetterStatus, RenderModel},
    word_source::WordSource,
    TypingTest,
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
/// Lines of upcoming words shown below the one being typed
const LOOKAHEAD_LINES: usize = 2;

/// Split word indices into lines no wider than `width` columns.
pub fn layout_lines(model: &RenderModel, width: usize) -> Vec<Vec<usize>> {
    let mut lines: Vec<Vec<usize>> = vec![];
    let mut line: Vec<usize> = vec![];
    let mut used = 0;

    for (idx, word) in model.words.iter().enumerate() {
        let w = word.text.width() + word.overflow.width();
        let needed = if line.is_empty() { w } else { used + 1 + w };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
            used = w;
        } else {
            used = needed;
        }
        line.push(idx);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// The window of lines to display: the current line plus a few ahead
fn visible_lines(model: &RenderModel, width: usize) -> Vec<Vec<usize>> {
    let lines = layout_lines(model, width);
    let current = lines
        .iter()
        .position(|l| l.contains(&model.current_word_index))
        .unwrap_or(0);
    lines
        .into_iter()
        .skip(current)
        .take(LOOKAHEAD_LINES + 1)
        .collect()
}

fn word_spans(model: &RenderModel, idx: usize) -> Vec<Span<'static>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().patch(bold_style).add_modifier(Modifier::DIM);
    let is_current = idx == model.current_word_index;
    let word = &model.words[idx];

    let mut spans: Vec<Span> = word
        .text
        .chars()
        .zip(word.letters.iter())
        .map(|(c, status)| {
            let style = match status {
                LetterStatus::Correct => bold_style.fg(Color::Green),
                LetterStatus::Incorrect => bold_style.fg(Color::Red),
                LetterStatus::Pending => dim_style,
            };
            let style = if is_current {
                style.add_modifier(Modifier::UNDERLINED)
            } else {
                style
            };
            Span::styled(c.to_string(), style)
        })
        .collect();

    if !word.overflow.is_empty() {
        spans.push(Span::styled(
            word.overflow.clone(),
            bold_style.fg(Color::Red).add_modifier(Modifier::CROSSED_OUT),
        ));
    }
    spans
}

fn duration_spans<S: WordSource>(test: &TypingTest<S>) -> Vec<Span<'static>> {
    let selected = test
        .pending_duration()
        .unwrap_or(test.config().duration_secs);
    TypingTest::<S>::duration_options()
        .iter()
        .flat_map(|&secs| {
            let style = if secs == selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };
            [Span::styled(format!("{secs}"), style), Span::raw(" ")]
        })
        .collect()
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let test = &app.test;
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // status
            Constraint::Min(0),    // padding
            Constraint::Length((LOOKAHEAD_LINES + 1) as u16),
            Constraint::Length(1), // padding
            Constraint::Length(1), // input echo
            Constraint::Min(0),    // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let (wpm, accuracy) = test
        .live_metrics()
        .map_or((0, 0), |live| (live.wpm, live.accuracy));
    let mut status = vec![
        Span::styled(format!("{}s", test.clock().remaining_secs()), bold_style),
        Span::raw("   "),
        Span::styled(format!("{wpm} wpm   {accuracy}%"), bold_style),
        Span::raw("   "),
    ];
    status.extend(duration_spans(test));
    Paragraph::new(Line::from(status))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let model = test.render_model();
    let width = chunks[2].width as usize;
    let lines: Vec<Line> = visible_lines(&model, width.max(1))
        .into_iter()
        .map(|indices| {
            let mut spans = vec![];
            for (n, idx) in indices.into_iter().enumerate() {
                if n > 0 {
                    spans.push(Span::raw(" "));
                }
                spans.extend(word_spans(&model, idx));
            }
            Line::from(spans)
        })
        .collect();
    Paragraph::new(lines).render(chunks[2], buf);

    Paragraph::new(Span::styled(format!("> {}", app.input), bold_style)).render(chunks[4], buf);

    let legend = if test.state() == SessionState::Idle {
        "start typing / (←/→) duration / (tab) restart / (esc)ape"
    } else {
        "(tab) or (space, enter) restart / (esc)ape"
    };
    Paragraph::new(Span::styled(legend, italic_style)).render(chunks[6], buf);
}

fn render_results(report: &SessionReport, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // chart
            Constraint::Length(1), // stats
            Constraint::Length(1), // details
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let bounds = report.chart_bounds();
    let wpm_points = report.wpm_points();
    let accuracy_points = report.accuracy_points();
    let datasets = vec![
        Dataset::default()
            .name("wpm")
            .marker(Marker::Braille)
            .style(Style::default().fg(Color::Magenta))
            .graph_type(GraphType::Line)
            .data(&wpm_points),
        Dataset::default()
            .name("accuracy %")
            .marker(Marker::Braille)
            .style(Style::default().fg(Color::Green))
            .graph_type(GraphType::Line)
            .data(&accuracy_points),
    ];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds(bounds.x)
                .labels(vec![
                    Span::styled(format_label(bounds.x[0]), bold_style),
                    Span::styled(format_label(bounds.x[1]), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .bounds(bounds.y)
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(format_label(bounds.y[1]), bold_style),
                ]),
        )
        .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        format!(
            "{} wpm   {}% acc   {:.2} sd",
            report.wpm, report.accuracy, report.consistency
        ),
        bold_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        format!(
            "peak {} wpm   {}/{} chars   {}s test",
            report.peak_wpm,
            report.correct_characters,
            report.total_typed_characters,
            report.duration_secs
        ),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        "(r)etry / (←/→) duration / (esc)ape",
        italic_style,
    ))
    .render(chunks[4], buf);
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.test.report() {
            Some(report) => render_results(report, area, buf),
            None => render_typing(self, area, buf),
        }
    }
}
