//! Layout model for the game's on-screen panels.

use app::map_view::PanelRect;
use taffy::prelude::*;
use taffy::{TaffyError, TaffyTree};

pub struct LayoutNodes {
    root: NodeId,
    status: NodeId,
    main_row: NodeId,
    map: NodeId,
    event_log: NodeId,
    legend: NodeId,
}

pub struct FrameLayout {
    pub status: PanelRect,
    pub map: PanelRect,
    pub event_log: PanelRect,
    pub legend: PanelRect,
}

impl FrameLayout {
    pub fn panels(&self) -> [PanelRect; 4] {
        [self.status, self.map, self.event_log, self.legend]
    }
}

pub fn setup_layout(taffy: &mut TaffyTree<()>) -> Result<LayoutNodes, TaffyError> {
    let status = taffy.new_leaf(Style {
        size: Size { width: percent(1.0), height: length(56.0) },
        margin: taffy::Rect { left: zero(), right: zero(), top: zero(), bottom: length(20.0) },
        ..Default::default()
    })?;
    let map = taffy.new_leaf(Style {
        flex_grow: 2.5,
        margin: taffy::Rect { left: zero(), right: length(20.0), top: zero(), bottom: zero() },
        ..Default::default()
    })?;
    let event_log = taffy.new_leaf(Style { flex_grow: 1.0, ..Default::default() })?;
    let main_row = taffy.new_with_children(
        Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Row,
            size: Size { width: percent(1.0), height: auto() },
            flex_grow: 1.0,
            ..Default::default()
        },
        &[map, event_log],
    )?;
    let legend = taffy.new_leaf(Style {
        size: Size { width: percent(1.0), height: length(36.0) },
        margin: taffy::Rect { left: zero(), right: zero(), top: length(20.0), bottom: zero() },
        ..Default::default()
    })?;
    let root = taffy.new_with_children(
        Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            size: Size { width: percent(1.0), height: percent(1.0) },
            padding: taffy::Rect {
                left: length(20.0),
                right: length(20.0),
                top: length(20.0),
                bottom: length(20.0),
            },
            ..Default::default()
        },
        &[status, main_row, legend],
    )?;
    Ok(LayoutNodes { root, status, main_row, map, event_log, legend })
}

pub fn compute_frame_layout(
    taffy: &mut TaffyTree<()>,
    nodes: &LayoutNodes,
    viewport_width: f32,
    viewport_height: f32,
) -> Result<FrameLayout, TaffyError> {
    let available_size = Size {
        width: AvailableSpace::Definite(viewport_width),
        height: AvailableSpace::Definite(viewport_height),
    };
    taffy.compute_layout(nodes.root, available_size)?;

    let l_root = taffy.layout(nodes.root)?;
    let l_status = taffy.layout(nodes.status)?;
    let l_main = taffy.layout(nodes.main_row)?;
    let l_map = taffy.layout(nodes.map)?;
    let l_event = taffy.layout(nodes.event_log)?;
    let l_legend = taffy.layout(nodes.legend)?;

    Ok(FrameLayout {
        status: panel_rect(l_status, &[l_root]),
        map: panel_rect(l_map, &[l_root, l_main]),
        event_log: panel_rect(l_event, &[l_root, l_main]),
        legend: panel_rect(l_legend, &[l_root]),
    })
}

fn panel_rect(layout: &taffy::Layout, parents: &[&taffy::Layout]) -> PanelRect {
    let mut x = layout.location.x;
    let mut y = layout.location.y;
    for parent in parents {
        x += parent.location.x;
        y += parent.location.y;
    }

    PanelRect { x, y, width: layout.size.width, height: layout.size.height }
}
