//! Built-in streets that guarantee a playable day even without a catalog file.

use crate::catalog::StreetCatalog;
use crate::domain::{LatLng, Polyline, StreetRecord};

fn seed(id: &str, name: &str, tier: u8, points: &[(f64, f64)]) -> StreetRecord {
  let line = Polyline(points.iter().map(|&(lat, lng)| LatLng::new(lat, lng)).collect());
  let first = line.first();
  StreetRecord {
    id: id.into(),
    name: name.into(),
    tier,
    geometry: vec![line],
    lat: first.map(|p| p.lat),
    lng: first.map(|p| p.lng),
  }
}

/// A small slice of central Barcelona, all four tiers represented.
pub fn seed_streets() -> Vec<StreetRecord> {
  vec![
    seed("seed-01", "Passeig de Gràcia", 1, &[(41.3870, 2.1700), (41.3915, 2.1658), (41.3960, 2.1615)]),
    seed("seed-02", "Avinguda Diagonal", 1, &[(41.3780, 2.1330), (41.3960, 2.1620), (41.4090, 2.2050)]),
    seed("seed-03", "La Rambla", 1, &[(41.3765, 2.1775), (41.3818, 2.1738), (41.3870, 2.1700)]),
    seed("seed-04", "Gran Via de les Corts Catalanes", 1, &[(41.3740, 2.1400), (41.3870, 2.1660), (41.4040, 2.1980)]),
    seed("seed-05", "Carrer de Balmes", 2, &[(41.3870, 2.1660), (41.3975, 2.1540), (41.4080, 2.1420)]),
    seed("seed-06", "Carrer d'Aragó", 2, &[(41.3800, 2.1480), (41.3910, 2.1640), (41.4020, 2.1800)]),
    seed("seed-07", "Carrer de Mallorca", 2, &[(41.3820, 2.1450), (41.3935, 2.1620), (41.4050, 2.1790)]),
    seed("seed-08", "Via Laietana", 2, &[(41.3820, 2.1780), (41.3850, 2.1755), (41.3880, 2.1730)]),
    seed("seed-09", "Carrer de Pau Claris", 3, &[(41.3860, 2.1720), (41.3925, 2.1635), (41.3990, 2.1550)]),
    seed("seed-10", "Carrer de Sants", 3, &[(41.3750, 2.1340), (41.3755, 2.1390), (41.3760, 2.1440)]),
    seed("seed-11", "Carrer de Provença", 3, &[(41.3830, 2.1430), (41.3945, 2.1595), (41.4060, 2.1760)]),
    seed("seed-12", "Ronda de Sant Pere", 3, &[(41.3890, 2.1720), (41.3895, 2.1750), (41.3900, 2.1780)]),
    seed("seed-13", "Carrer de Verdi", 4, &[(41.4030, 2.1560), (41.4065, 2.1570), (41.4100, 2.1580)]),
    seed("seed-14", "Passeig de Sant Joan", 4, &[(41.3930, 2.1740), (41.3975, 2.1700), (41.4020, 2.1660)]),
    seed("seed-15", "Carrer del Bruc", 4, &[(41.3880, 2.1730), (41.3940, 2.1655), (41.4000, 2.1580)]),
  ]
}

pub fn seed_catalog() -> StreetCatalog {
  StreetCatalog::from_records(seed_streets())
}
