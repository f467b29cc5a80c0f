use crate::functions;
use crate::independence::{Decision, IndependenceTest};
use crate::partition::{Cell, Partitioning};
use crate::rank::Ranks;
use crate::rectangle::Rectangle;
use crate::table::CaseTable;
use tracing::{debug, trace};

/// Rectangles with fewer cases are terminal without being tested.
const MIN_TESTED_CASES: usize = 3;

/// Drives the adaptive partitioning of the rank plane of `x` and `y`.
#[derive(Debug)]
pub struct PartitionEngine<'a> {
    table: CaseTable<'a>,
    test: &'a IndependenceTest,
    cells: Vec<Cell>,
    mutual_information: f64,
}

impl<'a> PartitionEngine<'a> {
    pub fn new(x: &'a Ranks, y: &'a Ranks, test: &'a IndependenceTest) -> Self {
        Self {
            table: CaseTable::new(x, y),
            test,
            cells: Vec::new(),
            mutual_information: 0.0,
        }
    }

    pub fn run(mut self) -> Partitioning {
        let n = self.table.rows_len();
        let mut splits = 0;
        let mut refined_splits = 0;
        let mut max_pending = 1;

        let mut stack = vec![Rectangle::full(n)];
        while let Some(rect) = stack.pop() {
            trace!(
                "Rectangle x=[{}, {}] y=[{}, {}] with {} cases ({} pending)",
                rect.x.start(),
                rect.x.stop(),
                rect.y.start(),
                rect.y.stop(),
                rect.case_count(),
                stack.len()
            );
            if rect.case_count() < MIN_TESTED_CASES {
                self.terminate(rect);
                continue;
            }

            match self.test.decide(&self.table, &rect) {
                Decision::Split { center, refined } => {
                    splits += 1;
                    if refined {
                        refined_splits += 1;
                    }

                    let runs = self.table.regroup(&rect, center);
                    for child in rect.quadrants(center, runs) {
                        match child.case_count() {
                            0 => {}
                            count if count < MIN_TESTED_CASES => self.terminate(child),
                            _ => stack.push(child),
                        }
                    }
                    max_pending = max_pending.max(stack.len());
                }
                Decision::Uniform | Decision::Tied => self.terminate(rect),
            }
        }

        debug!(
            "Partitioned {} cases into {} cells: {} splits ({} refined), max pending {}, MI={:.6}",
            n,
            self.cells.len(),
            splits,
            refined_splits,
            max_pending,
            self.mutual_information
        );
        Partitioning {
            cells: self.cells,
            case_index: self.table.into_case_index(),
            mutual_information: self.mutual_information,
            splits,
            refined_splits,
            max_pending,
        }
    }

    fn terminate(&mut self, rect: Rectangle) {
        let contribution = functions::mi_contribution(
            rect.case_count(),
            rect.x.width(),
            rect.y.width(),
            self.table.rows_len(),
        );
        self.mutual_information += contribution;
        self.cells.push(Cell {
            x: rect.x,
            y: rect.y,
            cases: rect.cases,
            contribution,
        });
    }
}
