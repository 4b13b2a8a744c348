//! Contrato común de las entidades persistidas
//!
//! Cada registro declara su clave, el formulario que lo enlaza (sólo los
//! campos permitidos) y el conjunto del contexto de datos donde vive. El
//! controlador CRUD y el router genérico se escriben una sola vez sobre este
//! trait.

use std::fmt::{Debug, Display};

use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

use crate::repositories::{DbContext, SharedSet};

pub trait Entity: Clone + Debug + Serialize + Send + Sync + 'static {
    type Key: Copy + Eq + Ord + Debug + Display + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Campos enlazables desde un formulario, con sus reglas de validación
    type Form: Validate + Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static;

    /// Nombre del conjunto en el contexto de datos
    const SET_NAME: &'static str;

    /// Segmento de ruta del controlador
    const ROUTE: &'static str;

    fn key(&self) -> Self::Key;

    /// Clave que trae el formulario, si trae alguna
    fn form_key(form: &Self::Form) -> Option<Self::Key>;

    /// Clave natural de un registro nuevo. `None` (por defecto) deja la
    /// clave al almacén, que la saca de su secuencia.
    fn natural_key(_form: &Self::Form) -> Option<Self::Key> {
        None
    }

    fn from_form(key: Self::Key, form: Self::Form) -> Self;

    /// Conjunto de esta entidad en el contexto, si está disponible
    fn set(context: &DbContext) -> Option<SharedSet<Self>>;
}
