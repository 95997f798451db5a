//! Mean Keplerian elements for the planets and the Earth–Moon barycentre.
//!
//! Elements and linear rates (per Julian century from J2000.0) are the
//! JPL "Approximate Positions of the Planets" table for 1800–2050
//! (Standish), referred to the J2000 ecliptic and equinox. Public domain.

/// Linear model `value = at_j2000 + per_century * T`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Rate {
    pub at_j2000: f64,
    pub per_century: f64,
}

impl Rate {
    const fn new(at_j2000: f64, per_century: f64) -> Self {
        Self {
            at_j2000,
            per_century,
        }
    }

    fn at(self, t: f64) -> f64 {
        self.at_j2000 + self.per_century * t
    }
}

/// Orbital elements of one body. Angles in degrees, semi-major axis in AU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct OrbitalElements {
    pub semi_major_axis_au: Rate,
    pub eccentricity: Rate,
    pub inclination_deg: Rate,
    pub mean_longitude_deg: Rate,
    pub perihelion_longitude_deg: Rate,
    pub node_longitude_deg: Rate,
}

pub(crate) const MERCURY: OrbitalElements = OrbitalElements {
    semi_major_axis_au: Rate::new(0.387_099_27, 0.000_000_37),
    eccentricity: Rate::new(0.205_635_93, 0.000_019_06),
    inclination_deg: Rate::new(7.004_979_02, -0.005_947_49),
    mean_longitude_deg: Rate::new(252.250_323_50, 149_472.674_111_75),
    perihelion_longitude_deg: Rate::new(77.457_796_28, 0.160_476_89),
    node_longitude_deg: Rate::new(48.330_765_93, -0.125_340_81),
};

pub(crate) const VENUS: OrbitalElements = OrbitalElements {
    semi_major_axis_au: Rate::new(0.723_335_66, 0.000_003_90),
    eccentricity: Rate::new(0.006_776_72, -0.000_041_07),
    inclination_deg: Rate::new(3.394_676_05, -0.000_788_90),
    mean_longitude_deg: Rate::new(181.979_099_50, 58_517.815_387_29),
    perihelion_longitude_deg: Rate::new(131.602_467_18, 0.002_683_29),
    node_longitude_deg: Rate::new(76.679_842_55, -0.277_694_18),
};

pub(crate) const EARTH_MOON_BARYCENTER: OrbitalElements = OrbitalElements {
    semi_major_axis_au: Rate::new(1.000_002_61, 0.000_005_62),
    eccentricity: Rate::new(0.016_711_23, -0.000_043_92),
    inclination_deg: Rate::new(-0.000_015_31, -0.012_946_68),
    mean_longitude_deg: Rate::new(100.464_571_66, 35_999.372_449_81),
    perihelion_longitude_deg: Rate::new(102.937_681_93, 0.323_273_64),
    node_longitude_deg: Rate::new(0.0, 0.0),
};

pub(crate) const MARS: OrbitalElements = OrbitalElements {
    semi_major_axis_au: Rate::new(1.523_710_34, 0.000_018_47),
    eccentricity: Rate::new(0.093_394_10, 0.000_078_82),
    inclination_deg: Rate::new(1.849_691_42, -0.008_131_31),
    mean_longitude_deg: Rate::new(-4.553_432_05, 19_140.302_684_99),
    perihelion_longitude_deg: Rate::new(-23.943_629_59, 0.444_410_88),
    node_longitude_deg: Rate::new(49.559_538_91, -0.292_573_43),
};

pub(crate) const JUPITER: OrbitalElements = OrbitalElements {
    semi_major_axis_au: Rate::new(5.202_887_00, -0.000_116_07),
    eccentricity: Rate::new(0.048_386_24, -0.000_132_53),
    inclination_deg: Rate::new(1.304_396_95, -0.001_837_14),
    mean_longitude_deg: Rate::new(34.396_440_51, 3_034.746_127_75),
    perihelion_longitude_deg: Rate::new(14.728_479_83, 0.212_526_68),
    node_longitude_deg: Rate::new(100.473_909_09, 0.204_691_06),
};

pub(crate) const SATURN: OrbitalElements = OrbitalElements {
    semi_major_axis_au: Rate::new(9.536_675_94, -0.001_250_60),
    eccentricity: Rate::new(0.053_861_79, -0.000_509_91),
    inclination_deg: Rate::new(2.485_991_87, 0.001_936_09),
    mean_longitude_deg: Rate::new(49.954_244_23, 1_222.493_622_01),
    perihelion_longitude_deg: Rate::new(92.598_878_31, -0.418_972_16),
    node_longitude_deg: Rate::new(113.662_424_48, -0.288_677_94),
};

pub(crate) const URANUS: OrbitalElements = OrbitalElements {
    semi_major_axis_au: Rate::new(19.189_164_64, -0.001_961_76),
    eccentricity: Rate::new(0.047_257_44, -0.000_043_97),
    inclination_deg: Rate::new(0.772_637_83, -0.002_429_39),
    mean_longitude_deg: Rate::new(313.238_104_51, 428.482_027_85),
    perihelion_longitude_deg: Rate::new(170.954_276_30, 0.408_052_81),
    node_longitude_deg: Rate::new(74.016_925_03, 0.042_405_89),
};

pub(crate) const NEPTUNE: OrbitalElements = OrbitalElements {
    semi_major_axis_au: Rate::new(30.069_922_76, 0.000_262_91),
    eccentricity: Rate::new(0.008_590_48, 0.000_051_05),
    inclination_deg: Rate::new(1.770_043_47, 0.000_353_72),
    mean_longitude_deg: Rate::new(-55.120_029_69, 218.459_453_25),
    perihelion_longitude_deg: Rate::new(44.964_762_27, -0.322_414_64),
    node_longitude_deg: Rate::new(131.784_225_74, -0.005_086_64),
};

pub(crate) const PLUTO: OrbitalElements = OrbitalElements {
    semi_major_axis_au: Rate::new(39.482_116_75, -0.000_315_96),
    eccentricity: Rate::new(0.248_827_30, 0.000_051_70),
    inclination_deg: Rate::new(17.140_012_06, 0.000_048_18),
    mean_longitude_deg: Rate::new(238.929_038_33, 145.207_805_15),
    perihelion_longitude_deg: Rate::new(224.068_916_29, -0.040_629_42),
    node_longitude_deg: Rate::new(110.303_936_84, -0.011_834_82),
};

/// Solve Kepler's equation `E - e sin E = M` by Newton iteration (radians).
pub(crate) fn solve_kepler(mean_anomaly_rad: f64, eccentricity: f64) -> f64 {
    let mut ecc_anomaly = mean_anomaly_rad + eccentricity * mean_anomaly_rad.sin();
    for _ in 0..30 {
        let delta = (ecc_anomaly - eccentricity * ecc_anomaly.sin() - mean_anomaly_rad)
            / (1.0 - eccentricity * ecc_anomaly.cos());
        ecc_anomaly -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ecc_anomaly
}

/// Heliocentric J2000 ecliptic position in AU at `t` Julian centuries.
pub(crate) fn heliocentric_position(elements: &OrbitalElements, t: f64) -> [f64; 3] {
    let a = elements.semi_major_axis_au.at(t);
    let e = elements.eccentricity.at(t);
    let incl = elements.inclination_deg.at(t).to_radians();
    let mean_lon = elements.mean_longitude_deg.at(t);
    let peri = elements.perihelion_longitude_deg.at(t);
    let node = elements.node_longitude_deg.at(t);

    // Mean anomaly reduced to (-180, 180] so the Newton start is close.
    let mean_anomaly = gochara_core::normalize_to_pm180(mean_lon - peri).to_radians();
    let arg_peri = (peri - node).to_radians();
    let node = node.to_radians();

    let ecc_anomaly = solve_kepler(mean_anomaly, e);
    let x_orb = a * (ecc_anomaly.cos() - e);
    let y_orb = a * (1.0 - e * e).sqrt() * ecc_anomaly.sin();

    let (sw, cw) = arg_peri.sin_cos();
    let (sn, cn) = node.sin_cos();
    let (si, ci) = incl.sin_cos();

    [
        (cw * cn - sw * sn * ci) * x_orb + (-sw * cn - cw * sn * ci) * y_orb,
        (cw * sn + sw * cn * ci) * x_orb + (-sw * sn + cw * cn * ci) * y_orb,
        (sw * si) * x_orb + (cw * si) * y_orb,
    ]
}
