//! The functionality related to the menu renderer.

use crate::app::{AppMenu, Difficulty};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::Frame,
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table, Widget},
};

const LEGEND_TEXT: [&str; 3] = [
    "[↑][↓] / [w][s] / [k][j]: select a difficulty",
    "[SPACE] / [ENTER]: start a round",
    "[q] / [ESC]: leave",
];
const LEGEND_TEXT_COLOR: Color = Color::DarkGray;

pub fn render_menu(menu: &mut AppMenu, frame: &mut Frame) {
    // The root container is the whole terminal rectangle.
    let root_container = frame.size();

    // The app layout consists of the menu and legend containers. The menu container's size is first calculated as the
    // remainder of the height after all the other allocations.
    let (menu_container, legend_container) = create_app_layout(&root_container);

    // Here menu gets shrank to some concrete dimensions.
    let (menu_container, menu_items_containers) =
        create_menu_layout(&menu_container, Difficulty::ALL.len() as u16);

    // 1. Render the terminal background.
    frame.render_widget(Block::default().bg(Color::White), root_container);

    // A closure to build a given menu item's style on the fly.
    let build_menu_item_style = |selected: bool| {
        Style::default()
            .bg(if selected { Color::Yellow } else { Color::White })
            .fg(if selected { Color::White } else { Color::Yellow })
    };

    // 2. Run through the list of the difficulty presets and render them all as paragraphs.
    Difficulty::ALL.into_iter().enumerate().for_each(|(i, difficulty)| {
        let (width, height, bombs) = difficulty.preset();

        frame.render_widget(
            Paragraph::new(format!(
                "\n{}: {}x{}, {} bombs",
                difficulty.label(),
                width,
                height,
                bombs
            ))
            .alignment(Alignment::Center)
            .style(build_menu_item_style(difficulty == menu.selected_difficulty)),
            menu_items_containers[i],
        )
    });

    // 3. Render the border around the menu.
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow)),
        menu_container,
    );

    // 4. Render the legend.
    frame.render_widget(build_legend_widget(), legend_container);
}

/// The function builds a layout for the application (this time, the menu). The layout of the menu is represented with
/// 2 rectangles: one for the menu itself (to hold the difficulty presets) and one for the legend (the in-menu controls
/// description).
fn create_app_layout(container: &Rect) -> (Rect, Rect) {
    // The height of the legend is calculated based on the amount of lines in the legend text we need to display.
    let legend_container_height = LEGEND_TEXT.len() as u16;
    // The menu container's height is all that's left in the parental container.
    let menu_container_height = container.height - legend_container_height;

    // Create a vector of vertically-stacked rectangles with the pre-defined heights.
    let vertical_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(Constraint::from_lengths([
            menu_container_height,
            legend_container_height,
        ]))
        .split(*container)
        .to_vec();

    // There's no need to horizontally split the menu container (to horizontally align it) because it's going to be
    // processed further and the menu is going to have a hard-coded width.
    let menu_container = vertical_layout[0];

    // The legend container is 90% of the width of the container and is horizontally-centered.
    let legend_container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_percentages([5, 90, 5]))
        .split(vertical_layout[1])[1];

    (menu_container, legend_container)
}

fn create_menu_layout(container: &Rect, menu_items_amount: u16) -> (Rect, Vec<Rect>) {
    // The height for the menu is the number of menu items multiplied by one item's height (3) and plus 2 (because of 1
    // char padding top and bottom).
    let settings_container_height = 3 * menu_items_amount + 2;
    // This is purely a constant.
    let settings_container_width = 40;

    // Create a vertical grid to vertically center the menu items container.
    let vertical_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(Constraint::from_lengths([
            (container.height - settings_container_height) / 2,
            settings_container_height,
            (container.height - settings_container_height) / 2,
        ]))
        .split(*container);

    // Divide the middle part of the vertical layout in such a manner to visually center the menu items container
    // horizontally.
    let menu_items_container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_lengths([
            (container.width - settings_container_width) / 2,
            settings_container_width,
            (container.width - settings_container_width) / 2,
        ]))
        .split(vertical_layout[1])[1];

    (
        // Return the menu items container...
        menu_items_container,
        // ...and separate sub-containers for each of the individual menu items.
        Layout::default()
            .direction(Direction::Vertical)
            .constraints(Constraint::from_lengths([3, 3, 3]))
            .margin(1)
            .split(menu_items_container)
            .to_vec(),
    )
}

/// The function builds the ready-to-use legend block (some text that provides information about the in-menu controls).
fn build_legend_widget() -> impl Widget {
    let rows = LEGEND_TEXT.map(|legend_line| {
        let cells = legend_line.split_at(legend_line.find(':').expect("Couldn't find the delimiter character (`:`). Double-check the `LEGEND_TEXT` const's contents."));

        Row::new([
            Line::from(cells.0).alignment(Alignment::Right),
            Line::from(cells.1).alignment(Alignment::Left),
        ])
    });

    Table::new(rows, Constraint::from_percentages([50, 50])).fg(LEGEND_TEXT_COLOR)
}
