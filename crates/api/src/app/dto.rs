//! Request DTOs and their validation schemas.
//!
//! Every field is optional at the serde layer so that one pass can
//! collect all presence and constraint violations; the validated output
//! is the trimmed, stripped value handed to the services.

use chrono::{Datelike, Utc};
use serde::Deserialize;

use videoclub_catalog::MovieDraft;
use videoclub_core::MovieId;

use crate::app::validate::{ValidateBody, Violations};

const MOVIE_YEAR_MIN: i64 = 1888;

/// Movie create/update body (`POST /movies`, `PUT /movies/:id`).
#[derive(Debug, Deserialize)]
pub struct MovieBody {
    titulo: Option<String>,
    genero: Option<String>,
    stock_total: Option<i64>,
    stock_disponible: Option<i64>,
    precio_alquiler: Option<f64>,
    poster_url: Option<String>,
    director: Option<String>,
    anio: Option<i64>,
    duracion: Option<i64>,
    descripcion: Option<String>,
}

impl ValidateBody for MovieBody {
    type Output = MovieDraft;

    fn validate(self) -> Result<MovieDraft, Violations> {
        let mut violations = Violations::new();

        let title = required_string(self.titulo, "El título es requerido", &mut violations);
        if let Some(t) = &title {
            if t.chars().count() > 200 {
                violations.push("El título no puede exceder 200 caracteres");
            }
        }

        let genre = required_string(self.genero, "El género es requerido", &mut violations);
        if let Some(g) = &genre {
            if g.chars().count() > 50 {
                violations.push("El género no puede exceder 50 caracteres");
            }
        }

        let total_stock = required_count(
            self.stock_total,
            "El stock total es requerido",
            "El stock total no puede ser negativo",
            &mut violations,
        );
        let available_stock = required_count(
            self.stock_disponible,
            "El stock disponible es requerido",
            "El stock disponible no puede ser negativo",
            &mut violations,
        );

        let rental_price = match self.precio_alquiler {
            None => {
                violations.push("El precio es requerido");
                None
            }
            Some(p) if p <= 0.0 => {
                violations.push("El precio debe ser mayor a 0");
                None
            }
            Some(p) => Some(p),
        };

        let poster_url = optional_string(self.poster_url);
        if let Some(url) = &poster_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                violations.push("La URL del póster debe ser válida");
            }
        }

        let director = optional_string(self.director);
        if let Some(d) = &director {
            if d.chars().count() > 100 {
                violations.push("El director no puede exceder 100 caracteres");
            }
        }

        let year_max = i64::from(Utc::now().year()) + 5;
        if let Some(year) = self.anio {
            if !(MOVIE_YEAR_MIN..=year_max).contains(&year) {
                violations.push(format!(
                    "El año debe estar entre {MOVIE_YEAR_MIN} y {year_max}"
                ));
            }
        }

        if let Some(minutes) = self.duracion {
            if minutes < 1 {
                violations.push("La duración debe ser al menos 1 minuto");
            }
        }

        let description = optional_string(self.descripcion);
        if let Some(d) = &description {
            if d.chars().count() > 1000 {
                violations.push("La descripción no puede exceder 1000 caracteres");
            }
        }

        if !violations.is_empty() {
            return Err(violations);
        }

        // The unwraps are justified: a missing field pushed a violation.
        Ok(MovieDraft {
            title: title.unwrap(),
            genre: genre.unwrap(),
            total_stock: total_stock.unwrap(),
            available_stock: available_stock.unwrap(),
            rental_price: rental_price.unwrap(),
            poster_url,
            director,
            year: self.anio.map(|y| y as i32),
            duration_minutes: self.duracion.map(|d| d as u32),
            description,
        })
    }
}

/// Rental body (`POST /rentals`).
#[derive(Debug, Deserialize)]
pub struct RentalBody {
    pelicula_id: Option<String>,
}

impl ValidateBody for RentalBody {
    type Output = MovieId;

    fn validate(self) -> Result<MovieId, Violations> {
        let mut violations = Violations::new();
        let movie_id = match optional_string(self.pelicula_id) {
            None => {
                violations.push("El ID de la película es requerido");
                None
            }
            Some(raw) => match raw.parse::<MovieId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    violations.push("El ID de la película debe ser un UUID válido");
                    None
                }
            },
        };
        match movie_id {
            Some(id) if violations.is_empty() => Ok(id),
            _ => Err(violations),
        }
    }
}

/// Sanitized credentials for `POST /auth/login`.
#[derive(Debug, PartialEq, Eq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    email: Option<String>,
    password: Option<String>,
}

impl ValidateBody for LoginBody {
    type Output = LoginInput;

    fn validate(self) -> Result<LoginInput, Violations> {
        let mut violations = Violations::new();
        let email = validate_email(self.email, &mut violations);
        let password = validate_password(self.password, 6, &mut violations);
        let (Some(email), Some(password)) = (email, password) else {
            return Err(violations);
        };
        violations.finish(LoginInput { email, password })
    }
}

/// Sanitized registration data for `POST /auth/register`.
#[derive(Debug, PartialEq, Eq)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    email: Option<String>,
    password: Option<String>,
    nombre: Option<String>,
}

impl ValidateBody for RegisterBody {
    type Output = RegisterInput;

    fn validate(self) -> Result<RegisterInput, Violations> {
        let mut violations = Violations::new();
        let email = validate_email(self.email, &mut violations);
        let password = validate_password(self.password, 8, &mut violations);

        let name = required_string(self.nombre, "El nombre es requerido", &mut violations);
        if let Some(n) = &name {
            let len = n.chars().count();
            if len < 2 {
                violations.push("El nombre debe tener al menos 2 caracteres");
            } else if len > 100 {
                violations.push("El nombre no puede exceder 100 caracteres");
            }
        }

        let (Some(email), Some(password), Some(name)) = (email, password, name) else {
            return Err(violations);
        };
        violations.finish(RegisterInput { email, password, name })
    }
}

// -------------------------
// Field helpers
// -------------------------

/// Trim and drop empty strings; absent and empty are equivalent.
fn optional_string(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_string(
    value: Option<String>,
    missing: &'static str,
    violations: &mut Violations,
) -> Option<String> {
    let value = optional_string(value);
    if value.is_none() {
        violations.push(missing);
    }
    value
}

fn required_count(
    value: Option<i64>,
    missing: &'static str,
    negative: &'static str,
    violations: &mut Violations,
) -> Option<u32> {
    match value {
        None => {
            violations.push(missing);
            None
        }
        Some(v) if v < 0 => {
            violations.push(negative);
            None
        }
        Some(v) => Some(v as u32),
    }
}

fn validate_email(value: Option<String>, violations: &mut Violations) -> Option<String> {
    match optional_string(value) {
        None => {
            violations.push("El email es requerido");
            None
        }
        Some(email) if !is_valid_email(&email) => {
            violations.push("El email debe ser válido");
            None
        }
        Some(email) => Some(email),
    }
}

fn validate_password(
    value: Option<String>,
    min_len: usize,
    violations: &mut Violations,
) -> Option<String> {
    match value.filter(|v| !v.is_empty()) {
        None => {
            violations.push("La contraseña es requerida");
            None
        }
        Some(password) if password.chars().count() < min_len => {
            violations.push(format!(
                "La contraseña debe tener al menos {min_len} caracteres"
            ));
            None
        }
        Some(password) => Some(password),
    }
}

fn is_valid_email(value: &str) -> bool {
    if value.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !domain.contains('@')
}
