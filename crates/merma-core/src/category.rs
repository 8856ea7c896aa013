//! # Category Classifier
//!
//! Derives a product category from the first word of the product name.
//!
//! ```text
//! "Leche entera 1L"   ──► first token "Leche" ──► "LECHE" ──► Category::Leche
//! "Café sello rojo"   ──► "CAFÉ" ──► fold accents "CAFE" ──► Category::Cafe
//! "Pilas AA x4"       ──► "PILAS" ──► not in list ──► Category::Otros
//! "   "               ──► no token ──► Category::SinCategoria
//! ```
//!
//! The list is closed: adding a category is a code change, never data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Aceite,
    Agua,
    Arroz,
    Azucar,
    Cafe,
    Cerveza,
    Chocolate,
    Cigarrillos,
    Detergente,
    Galletas,
    Gaseosa,
    Harina,
    Huevos,
    Jabon,
    Jugo,
    Leche,
    Papel,
    Pasta,
    Sal,
    Shampoo,
    /// Name has a first word that is not in the allow-list.
    Otros,
    /// Name is blank.
    SinCategoria,
}

impl Category {
    /// Categories a first token can match.
    pub const ALLOW_LIST: [Category; 20] = [
        Category::Aceite,
        Category::Agua,
        Category::Arroz,
        Category::Azucar,
        Category::Cafe,
        Category::Cerveza,
        Category::Chocolate,
        Category::Cigarrillos,
        Category::Detergente,
        Category::Galletas,
        Category::Gaseosa,
        Category::Harina,
        Category::Huevos,
        Category::Jabon,
        Category::Jugo,
        Category::Leche,
        Category::Papel,
        Category::Pasta,
        Category::Sal,
        Category::Shampoo,
    ];

    /// Default order of report sections: groceries first, then drinks,
    /// then household, then the fallbacks.
    pub fn display_order() -> Vec<Category> {
        vec![
            Category::Arroz,
            Category::Aceite,
            Category::Azucar,
            Category::Sal,
            Category::Harina,
            Category::Pasta,
            Category::Huevos,
            Category::Leche,
            Category::Cafe,
            Category::Chocolate,
            Category::Galletas,
            Category::Agua,
            Category::Gaseosa,
            Category::Jugo,
            Category::Cerveza,
            Category::Cigarrillos,
            Category::Jabon,
            Category::Detergente,
            Category::Shampoo,
            Category::Papel,
            Category::Otros,
            Category::SinCategoria,
        ]
    }

    /// Returns the uppercase label used in reports and in the allow-list.
    pub const fn label(self) -> &'static str {
        match self {
            Category::Aceite => "ACEITE",
            Category::Agua => "AGUA",
            Category::Arroz => "ARROZ",
            Category::Azucar => "AZUCAR",
            Category::Cafe => "CAFE",
            Category::Cerveza => "CERVEZA",
            Category::Chocolate => "CHOCOLATE",
            Category::Cigarrillos => "CIGARRILLOS",
            Category::Detergente => "DETERGENTE",
            Category::Galletas => "GALLETAS",
            Category::Gaseosa => "GASEOSA",
            Category::Harina => "HARINA",
            Category::Huevos => "HUEVOS",
            Category::Jabon => "JABON",
            Category::Jugo => "JUGO",
            Category::Leche => "LECHE",
            Category::Papel => "PAPEL",
            Category::Pasta => "PASTA",
            Category::Sal => "SAL",
            Category::Shampoo => "SHAMPOO",
            Category::Otros => "OTROS",
            Category::SinCategoria => "SIN CATEGORIA",
        }
    }

    /// Whether this is one of the two fallback categories.
    pub const fn is_fallback(self) -> bool {
        matches!(self, Category::Otros | Category::SinCategoria)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses a label exactly as [`Category::label`] prints it (case and accents
/// are normalized, so `"café"` parses too).
impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_token(s.trim());
        Category::display_order()
            .into_iter()
            .find(|c| c.label() == normalized || (c == &Category::SinCategoria && normalized == "SIN_CATEGORIA"))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "category".to_string(),
                allowed: Category::display_order()
                    .iter()
                    .map(|c| c.label().to_string())
                    .collect(),
            })
    }
}

/// Classifies a product name.
///
/// Total and pure: every input maps to exactly one category.
///
/// ```rust
/// use merma_core::category::{classify, Category};
///
/// assert_eq!(classify("Arroz Diana 500g"), Category::Arroz);
/// assert_eq!(classify("azúcar manuelita"), Category::Azucar);
/// assert_eq!(classify("Pilas AA"), Category::Otros);
/// assert_eq!(classify(""), Category::SinCategoria);
/// ```
pub fn classify(name: &str) -> Category {
    let Some(first) = name.split_whitespace().next() else {
        return Category::SinCategoria;
    };

    let token = normalize_token(first);
    Category::ALLOW_LIST
        .into_iter()
        .find(|c| c.label() == token)
        .unwrap_or(Category::Otros)
}

/// Uppercases and strips Spanish accent marks. `Ñ` is a letter, not an
/// accented `N`, so it is kept.
fn normalize_token(token: &str) -> String {
    token
        .chars()
        .flat_map(char::to_uppercase)
        .map(|c| match c {
            'Á' | 'À' | 'Ä' => 'A',
            'É' | 'È' | 'Ë' => 'E',
            'Í' | 'Ì' | 'Ï' => 'I',
            'Ó' | 'Ò' | 'Ö' => 'O',
            'Ú' | 'Ù' | 'Ü' => 'U',
            other => other,
        })
        .collect()
}

/// Orders `categories` by `order`, appending anything `order` does not list
/// in default display order.
pub fn resolve_order(order: &[Category]) -> Vec<Category> {
    let mut resolved: Vec<Category> = Vec::with_capacity(Category::display_order().len());
    for category in order.iter().copied().chain(Category::display_order()) {
        if !resolved.contains(&category) {
            resolved.push(category);
        }
    }
    resolved
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_first_token() {
        assert_eq!(classify("LECHE ALQUERIA 1L"), Category::Leche);
        assert_eq!(classify("leche deslactosada"), Category::Leche);
        assert_eq!(classify("  Gaseosa Postobon 400ml  "), Category::Gaseosa);
        assert_eq!(classify("Cerveza\tAguila"), Category::Cerveza);
    }

    #[test]
    fn test_classify_only_looks_at_first_token() {
        assert_eq!(classify("Galletas de leche"), Category::Galletas);
        assert_eq!(classify("Bolsa de arroz"), Category::Otros);
    }

    #[test]
    fn test_classify_folds_accents() {
        assert_eq!(classify("Café Águila Roja"), Category::Cafe);
        assert_eq!(classify("Jabón Rey"), Category::Jabon);
        assert_eq!(classify("AZÚCAR"), Category::Azucar);
    }

    #[test]
    fn test_classify_fallbacks() {
        assert_eq!(classify("Pilas AA"), Category::Otros);
        assert_eq!(classify("6f1c0a54-0c0e-4a8e-9b0a-2a3f4e5d6c7b"), Category::Otros);
        assert_eq!(classify(""), Category::SinCategoria);
        assert_eq!(classify("   \n"), Category::SinCategoria);
    }

    #[test]
    fn test_classify_is_total_and_stable() {
        let names = [
            "Arroz", "ñame", "Ñoquis", "123", "!!!", "Sal refisal", "Papel higienico",
            "aceite", "x", "Café", "",
        ];
        for name in names {
            let first = classify(name);
            assert_eq!(classify(name), first);
            assert!(
                Category::ALLOW_LIST.contains(&first) || first.is_fallback(),
                "{name} classified outside the closed list"
            );
        }
    }

    #[test]
    fn test_classify_own_label_round_trips() {
        for category in Category::ALLOW_LIST {
            assert_eq!(classify(category.label()), category);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("cafe".parse::<Category>().unwrap(), Category::Cafe);
        assert_eq!("Jabón".parse::<Category>().unwrap(), Category::Jabon);
        assert_eq!("sin categoria".parse::<Category>().unwrap(), Category::SinCategoria);
        assert!("PILAS".parse::<Category>().is_err());
    }

    #[test]
    fn test_display_order_covers_every_category() {
        let order = Category::display_order();
        for category in Category::ALLOW_LIST {
            assert!(order.contains(&category));
        }
        assert!(order.contains(&Category::Otros));
        assert!(order.contains(&Category::SinCategoria));
    }

    #[test]
    fn test_resolve_order_puts_custom_first() {
        let resolved = resolve_order(&[Category::Cerveza, Category::Leche]);
        assert_eq!(resolved[0], Category::Cerveza);
        assert_eq!(resolved[1], Category::Leche);
        assert_eq!(resolved.len(), Category::display_order().len());
        assert_eq!(resolved.iter().filter(|c| **c == Category::Leche).count(), 1);
    }
}
