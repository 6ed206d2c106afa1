use unoscratch_core::*;

/// Player cells per printed line.
const CARDS_PER_LINE: u32 = 11;

/// Rows of board cards, each followed by its prize.
const ROWS: u32 = 4;
const CARDS_PER_ROW: usize = 5;

/// Texture pixels per world unit.
const DENSITY: f32 = 64.0;

/// Printed ticket: player cells on one scratch panel, one small panel per row prize.
pub fn standard_layout(player_cells: u32) -> Result<TicketLayout> {
    let lines = player_cells.div_ceil(CARDS_PER_LINE).max(1);
    let panel = Bounds::new(
        Vec2::new(0.0, 0.0),
        Vec2::new(CARDS_PER_LINE as f32, lines as f32),
    )?;
    let mut surfaces = vec![surface(SurfaceId(0), panel)?];

    let card_cells = (0..player_cells)
        .map(|i| {
            let x = (i % CARDS_PER_LINE) as f32;
            let y = (i / CARDS_PER_LINE) as f32;
            Ok(CellSlot {
                surface: SurfaceId(0),
                bounds: Bounds::new(Vec2::new(x, y), Vec2::new(x + 1.0, y + 1.0))?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::new();
    for row in 0..ROWS {
        let y = lines as f32 + 1.0 + row as f32 * 1.5;
        let x = CARDS_PER_ROW as f32 + 1.0;
        let bounds = Bounds::new(Vec2::new(x, y), Vec2::new(x + 2.0, y + 1.0))?;
        let id = SurfaceId(1 + row);
        surfaces.push(surface(id, bounds)?);
        rows.push(RowLayout {
            card_slots: CARDS_PER_ROW,
            prize: CellSlot {
                surface: id,
                bounds,
            },
        });
    }

    Ok(TicketLayout {
        surfaces,
        card_cells,
        rows,
    })
}

fn surface(id: SurfaceId, bounds: Bounds) -> Result<ScratchSurface> {
    let size = bounds.size();
    let texture = (
        (size.x * DENSITY).round() as Px,
        (size.y * DENSITY).round() as Px,
    );
    ScratchSurface::new(id, bounds, texture)
}
