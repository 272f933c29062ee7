//! Named points that can stand in for raw coordinates.

use serde::Serialize;

use crate::geo::Coordinate;

/// A place name that is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown place: {0:?}")]
pub struct UnknownPlace(pub String);

/// A well-known point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub name: &'static str,
    pub city: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Place {
    pub fn location(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

const fn place(name: &'static str, city: &'static str, lat: f64, lon: f64) -> Place {
    Place {
        name,
        city,
        lat,
        lon,
    }
}

static PLACES: &[Place] = &[
    place("Kolkata (Esplanade)", "Kolkata", 22.5667, 88.3667),
    place("Salt Lake (Sector V)", "Kolkata", 22.5792, 88.4317),
    place("Howrah Maidan", "Kolkata", 22.5892, 88.3475),
    place("Garia", "Kolkata", 22.4629, 88.3968),
    place("Behala", "Kolkata", 22.49814, 88.31084),
    place("Jadavpur", "Kolkata", 22.50251, 88.36761),
    place("Alipore", "Kolkata", 22.53917, 88.32728),
    place("Kharagpur", "West Bengal", 22.3400, 87.3250),
    place("Bhubaneswar", "Odisha", 20.2961, 85.8250),
    place("Delhi", "Delhi", 28.6315, 77.2167),
    place("Connaught Place", "Delhi", 28.63278, 77.21972),
    place("Karol Bagh", "Delhi", 28.6629, 77.2100),
    place("Hauz Khas", "Delhi", 28.5471, 77.2040),
    place("Dwarka", "Delhi", 28.58452, 77.04918),
    place("Rohini", "Delhi", 28.7383, 77.0822),
    place("New Delhi (city core)", "Delhi", 28.6448, 77.21672),
    place("Lajpat Nagar", "Delhi", 28.56927, 77.24411),
    place("Chandni Chowk", "Delhi", 28.656, 77.2310),
    place("Greater Kailash", "Delhi", 28.54434, 77.23971),
    place("Janakpuri", "Delhi", 28.62, 77.09444),
    place("Bandra", "Mumbai", 19.054444, 72.840556),
    place("Andheri", "Mumbai", 19.114424, 72.867943),
    place("Juhu", "Mumbai", 19.1, 72.83),
    place("Colaba", "Mumbai", 18.91, 72.81),
    place("Dadar", "Mumbai", 19.021, 72.841),
    place("Malad", "Mumbai", 19.186111, 72.848611),
    place("Powai", "Mumbai", 19.1164, 72.9047),
    place("Borivali", "Mumbai", 19.23, 72.86),
    place("Chembur", "Mumbai", 19.051, 72.894),
    place("Kurla", "Mumbai", 19.059984, 72.889999),
    place("Banjara Hills", "Hyderabad", 17.415, 78.440),
    place("Gachibowli", "Hyderabad", 17.4372, 78.3444),
    place("Jubilee Hills", "Hyderabad", 17.4165, 78.4382),
    place("HITEC City", "Hyderabad", 17.44155, 78.38264),
    place("Secunderabad", "Hyderabad", 17.43993, 78.49828),
    place("Madhapur", "Hyderabad", 17.44167, 78.39167),
    place("Kondapur", "Hyderabad", 17.483, 78.417),
    place("Ameerpet", "Hyderabad", 17.437462, 78.448288),
    place("Koti", "Hyderabad", 17.38564, 78.48371),
    place("Mehdipatnam", "Hyderabad", 17.3959, 78.4312),
    place("Koramangala", "Bengaluru", 12.934533, 77.626579),
    place("Indiranagar", "Bengaluru", 12.971891, 77.641151),
    place("Whitefield", "Bengaluru", 12.971389, 77.750130),
    place("Jayanagar", "Bengaluru", 12.925, 77.595),
    place("Bellandur", "Bengaluru", 12.94721, 77.57894),
    place("M G Road", "Bengaluru", 12.973801, 77.611885),
    place("Electronic City", "Bengaluru", 12.840711, 77.676369),
    place("Malleshwaram", "Bengaluru", 13.0031, 77.5643),
    place("Yelahanka", "Bengaluru", 13.1007, 77.5963),
    place("HSR Layout", "Bengaluru", 12.94722, 77.57895),
    place("Kochi", "Kerala", 9.931194, 76.267306),
    place("Thiruvananthapuram", "Kerala", 8.524111, 76.936611),
    place("Kozhikode", "Kerala", 11.24802, 75.7804),
    place("Thrissur", "Kerala", 10.51667, 76.21667),
    place("Alappuzha", "Kerala", 9.49004, 76.3264),
    place("Kannur", "Kerala", 11.8689, 75.35546),
    place("Kollam", "Kerala", 8.88113, 76.58469),
    place("Kottayam", "Kerala", 9.58692, 76.52132),
    place("Malappuram", "Kerala", 11.04019, 76.08237),
    place("Varkala", "Kerala", 8.7333, 76.7167),
];

/// The built-in place catalog, in display order.
#[derive(Debug, Clone, Copy)]
pub struct Places {
    places: &'static [Place],
}

impl Places {
    pub fn builtin() -> Self {
        Self { places: PLACES }
    }

    pub fn all(&self) -> &'static [Place] {
        self.places
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Look up a place by name, ignoring case and surrounding whitespace.
    pub fn find(&self, name: &str) -> Option<&'static Place> {
        let name = name.trim();
        self.places.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// The coordinates of a named place.
    pub fn resolve(&self, name: &str) -> Result<Coordinate, UnknownPlace> {
        self.find(name)
            .map(Place::location)
            .ok_or_else(|| UnknownPlace(name.trim().to_string()))
    }
}

impl Default for Places {
    fn default() -> Self {
        Self::builtin()
    }
}
