use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::convert::TryFrom;
use std::fmt;
use std::io::{stdout, Write};

use crate::{KonaneError, Result, MAX_SIDE, MIN_SIDE};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Cell {
    PlayerA,
    PlayerB,
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            _ => false,
        }
    }

    /// The piece colour of the other side, `Empty` stays `Empty`
    pub fn opponent(self) -> Self {
        match self {
            Cell::PlayerA => Cell::PlayerB,
            Cell::PlayerB => Cell::PlayerA,
            Cell::Empty => Cell::Empty,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::PlayerA => 'X',
            Cell::PlayerB => 'O',
            Cell::Empty => '.',
        }
    }
}

impl TryFrom<char> for Cell {
    type Error = KonaneError;

    fn try_from(symbol: char) -> Result<Self> {
        match symbol {
            'X' | 'x' => Ok(Cell::PlayerA),
            'O' | 'o' => Ok(Cell::PlayerB),
            '.' => Ok(Cell::Empty),
            _ => Err(KonaneError::InvalidOperation(format!(
                "'{}' is not a board symbol, cells hold only 'X', 'O' and '.'",
                symbol
            ))),
        }
    }
}

/// A board coordinate, 1-based in both axes
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// The four axis directions, in the order pieces are scanned for jumps
pub(crate) const DIRECTIONS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>, // cells are stored left-to-right, top-to-bottom
}

impl Board {
    /// Checks a board size against the rules: both sides even and between
    /// `MIN_SIDE` and `MAX_SIDE`
    ///
    /// Even sides put the same colour on both diagonal corners and leave a
    /// 2x2 block in the middle for the opening removals.
    pub fn check_size(width: usize, height: usize) -> Result<()> {
        for (name, side) in [("width", width), ("height", height)].iter() {
            if side % 2 != 0 || *side < MIN_SIDE || *side > MAX_SIDE {
                return Err(KonaneError::InvalidConfiguration {
                    message: format!(
                        "board {} {} must be even and between {} and {}",
                        name, side, MIN_SIDE, MAX_SIDE
                    ),
                });
            }
        }
        Ok(())
    }

    /// Creates a board in the starting checkerboard layout
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::check_size(width, height)?;
        let mut cells = Vec::with_capacity(width * height);
        for y in 1..=height {
            for x in 1..=width {
                cells.push(if (x + y) % 2 == 0 {
                    Cell::PlayerA
                } else {
                    Cell::PlayerB
                });
            }
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Parses a board from rows of 'X', 'O' and '.' symbols, top row first
    ///
    /// Whitespace inside a row is ignored.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let height = rows.len();
        let width = rows
            .first()
            .map(|row| row.as_ref().chars().filter(|c| !c.is_whitespace()).count())
            .unwrap_or(0);
        let mut board = Self::new(width, height)?;

        for (y, row) in rows.iter().enumerate() {
            let symbols = row
                .as_ref()
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(Cell::try_from)
                .collect::<Result<Vec<_>>>()?;
            if symbols.len() != width {
                return Err(KonaneError::InvalidOperation(format!(
                    "row {} has {} cells, expected {}",
                    y + 1,
                    symbols.len(),
                    width
                )));
            }
            let start = y * width;
            board.cells[start..start + width].copy_from_slice(&symbols);
        }
        Ok(board)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> Result<usize> {
        if x < 1 || x > self.width || y < 1 || y > self.height {
            return Err(KonaneError::out_of_bounds(x, y, self.width, self.height));
        }
        Ok((y - 1) * self.width + (x - 1))
    }

    pub fn get(&self, x: usize, y: usize) -> Result<Cell> {
        Ok(self.cells[self.index(x, y)?])
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell) -> Result<()> {
        let index = self.index(x, y)?;
        self.cells[index] = cell;
        Ok(())
    }

    /// Writes a cell given as a board symbol
    pub fn set_symbol(&mut self, x: usize, y: usize, symbol: char) -> Result<()> {
        // resolve both checks before touching the grid
        let cell = Cell::try_from(symbol)?;
        self.set(x, y, cell)
    }

    /// Unchecked-by-error lookup for signed offsets, `None` off the board
    pub(crate) fn at(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 1 || y < 1 || x as usize > self.width || y as usize > self.height {
            return None;
        }
        Some(self.cells[(y as usize - 1) * self.width + (x as usize - 1)])
    }

    pub fn count_of(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Every coordinate of the board, row by row
    pub fn positions(&self) -> impl Iterator<Item = Coord> {
        let (width, height) = (self.width, self.height);
        (1..=height).flat_map(move |y| (1..=width).map(move |x| Coord::new(x, y)))
    }

    /// Coordinates of every piece of the given colour, row by row
    pub fn pieces(&self, side: Cell) -> impl Iterator<Item = Coord> + '_ {
        self.positions()
            .filter(move |c| self.cells[(c.y - 1) * self.width + (c.x - 1)] == side)
    }

    /// Removes a single piece, as in the two opening rounds
    pub fn remove(&mut self, at: Coord) -> Result<()> {
        self.set(at.x, at.y, Cell::Empty)
    }

    /// Moves the piece at `from` to `to` along a row or column, clearing every
    /// cell jumped over on the way
    ///
    /// The jump pattern itself is not checked, only that both ends are on the
    /// board, `from` holds a piece and the two lie an even distance apart on one line.
    pub fn apply_jump(&mut self, from: Coord, to: Coord) -> Result<()> {
        let origin = self.index(from.x, from.y)?;
        self.index(to.x, to.y)?;
        let mover = self.cells[origin];
        if mover.is_empty() {
            return Err(KonaneError::InvalidOperation(format!(
                "no piece to move at ({})",
                from
            )));
        }

        let (dx, dy) = (to.x as i32 - from.x as i32, to.y as i32 - from.y as i32);
        if (dx != 0 && dy != 0) || (dx == 0 && dy == 0) || (dx + dy) % 2 != 0 {
            return Err(KonaneError::InvalidOperation(format!(
                "a jump from ({}) to ({}) is not an even straight-line move",
                from, to
            )));
        }

        let (step_x, step_y) = (dx.signum(), dy.signum());
        let (mut x, mut y) = (from.x as i32, from.y as i32);
        while (x, y) != (to.x as i32, to.y as i32) {
            self.cells[(y as usize - 1) * self.width + (x as usize - 1)] = Cell::Empty;
            x += step_x;
            y += step_y;
        }
        self.set(to.x, to.y, mover)
    }

    /// Whether `side` has at least one capturing jump available
    ///
    /// Only the first hop of each jump is looked at, which is all that decides
    /// whether the side can still move.
    pub fn has_jump(&self, side: Cell) -> bool {
        let other = side.opponent();
        self.pieces(side).any(|piece| {
            DIRECTIONS.iter().any(|&(dx, dy)| {
                let (x, y) = (piece.x as i32, piece.y as i32);
                self.at(x + dx, y + dy) == Some(other)
                    && self.at(x + 2 * dx, y + 2 * dy) == Some(Cell::Empty)
            })
        })
    }

    /// Draws the board to stdout with coloured pieces
    pub fn display(&self) -> anyhow::Result<()> {
        let mut stdout = stdout();

        let header: String = (1..=self.width).map(|x| format!("{:>2}", x)).collect();
        stdout.queue(PrintStyledContent(style(format!("   {}\n", header))))?;

        for y in 1..=self.height {
            stdout.queue(PrintStyledContent(style(format!("{:>2} ", y))))?;
            for x in 1..=self.width {
                let cell = self.cells[(y - 1) * self.width + (x - 1)];
                stdout.queue(PrintStyledContent(
                    style(format!(" {}", cell.symbol()))
                        .attribute(Attribute::Bold)
                        .on(Color::DarkBlue)
                        .with(match cell {
                            Cell::PlayerA => Color::Red,
                            Cell::PlayerB => Color::Yellow,
                            Cell::Empty => Color::Grey,
                        }),
                ))?;
            }
            stdout.queue(PrintStyledContent(style("\n")))?;
        }
        stdout.flush()?;
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for x in 1..=self.width {
            write!(f, " {}", x)?;
        }
        for y in 1..=self.height {
            write!(f, "\n{:<2}", y)?;
            for x in 1..=self.width {
                write!(f, " {}", self.cells[(y - 1) * self.width + (x - 1)].symbol())?;
            }
        }
        Ok(())
    }
}
