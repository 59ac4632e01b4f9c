/*
 * Responsibility
 * - Produit request/response body (camelCase JSON)
 */
use serde::{Deserialize, Serialize};

use crate::repos::Produit;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProduitDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub nom: Option<String>,
    #[serde(default)]
    pub prix: Option<f64>,
}

impl From<Produit> for ProduitDto {
    fn from(p: Produit) -> Self {
        Self {
            id: p.id,
            description: p.description,
            nom: p.nom,
            prix: p.prix,
        }
    }
}

impl From<ProduitDto> for Produit {
    fn from(dto: ProduitDto) -> Self {
        Self {
            id: dto.id,
            description: dto.description,
            nom: dto.nom,
            prix: dto.prix,
        }
    }
}
