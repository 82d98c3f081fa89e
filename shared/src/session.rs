//! Client-side view of the garage: the rendered page, the pagination cursor
//! and the car picked for editing.

use crate::model::{Car, CarDraft, CarId, CarPage, RaceEntry};
use crate::pagination::Pagination;

#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub id: CarId,
    pub previous_name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GarageState {
    pub pagination: Pagination,
    cars: Vec<Car>,
    selected: Option<Selection>,
}

impl GarageState {
    pub fn new(page_limit: usize) -> Self {
        Self {
            pagination: Pagination::new(page_limit),
            cars: Vec::new(),
            selected: None,
        }
    }

    /// Returns `true` when the cursor had to move back, i.e. the loaded page
    /// is past the end and must be fetched again.
    pub fn load_page(&mut self, page: CarPage) -> bool {
        let requested = self.pagination.current_page();
        self.pagination.set_total(page.total_count);
        self.cars = page.cars;
        if let Some(selected) = &self.selected {
            if self.car(selected.id).is_none() {
                self.selected = None;
            }
        }
        self.pagination.current_page() != requested
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn car(&self, id: CarId) -> Option<&Car> {
        self.cars.iter().find(|car| car.id == id)
    }

    pub fn ids(&self) -> Vec<CarId> {
        self.cars.iter().map(|car| car.id).collect()
    }

    /// Race snapshot of what is currently rendered.
    pub fn entries(&self) -> Vec<RaceEntry> {
        self.cars.iter().map(RaceEntry::from).collect()
    }

    pub fn selected(&self) -> Option<&Selection> {
        self.selected.as_ref()
    }

    pub fn select(&mut self, id: CarId) -> bool {
        match self.car(id) {
            Some(car) => {
                self.selected = Some(Selection {
                    id,
                    previous_name: car.name.clone(),
                });
                true
            }
            None => false,
        }
    }

    /// Consumes the selection. An empty name keeps the car's previous name.
    pub fn update_draft(&mut self, name: &str, color: &str) -> Option<(CarId, CarDraft)> {
        let selected = self.selected.take()?;
        let name = if name.trim().is_empty() {
            selected.previous_name
        } else {
            name.to_string()
        };
        Some((
            selected.id,
            CarDraft {
                name,
                color: color.to_string(),
            },
        ))
    }

    /// Mirrors a successful update into the rendered projection.
    pub fn apply_update(&mut self, id: CarId, draft: &CarDraft) {
        if let Some(car) = self.cars.iter_mut().find(|car| car.id == id) {
            car.name = draft.name.clone();
            car.color = draft.color.clone();
        }
    }

    pub fn title(&self) -> String {
        format!("Garage ({})", self.pagination.total_count())
    }
}
