/// Enkelt glidende snitt over de siste `N` rå-magnitudene.
/// Alle plasser starter på 0, så snittet ramper opp de første N samplene.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    buffer: Vec<f32>,
    position: usize,
}

impl MovingAverage {
    pub fn new(len: usize) -> Self {
        Self {
            buffer: vec![0.0; len.max(1)],
            position: 0,
        }
    }

    pub fn push(&mut self, value: f32) {
        self.buffer[self.position] = value;
        self.position = (self.position + 1) % self.buffer.len();
    }

    /// Sum av hele bufferet / kapasitet.
    pub fn average(&self) -> f32 {
        self.buffer.iter().sum::<f32>() / self.buffer.len() as f32
    }
}

/// Sirkulært vindu med glattede verdier og en roterende skriveposisjon.
/// Lengden er konstant; posisjonen wrapper modulo kapasitet.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    values: Vec<f32>,
    cursor: usize,
}

impl SampleWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: vec![0.0; capacity.max(1)],
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn get(&self, i: usize) -> f32 {
        self.values[i % self.values.len()]
    }

    /// Midtpunktet: en halv vindusbredde bak skrivemarkøren.
    pub fn midpoint(&self) -> usize {
        (self.cursor + self.values.len() / 2) % self.values.len()
    }

    /// Skriv `value` på markøren og bruk 3-tap-filteret
    /// (cur + 2·prev + prevprev) / 4. Under oppfylling lagres plass 0 rått,
    /// plass 1 blir snittet av de to første.
    /// Markøren flyttes ikke; se [`SampleWindow::advance`].
    pub fn store_smoothed(&mut self, value: f32, armed: bool) {
        let n = self.values.len();
        let pos = self.cursor;
        self.values[pos] = value;

        if armed || pos > 1 {
            let prev = self.values[(pos + n - 1) % n];
            let prev_prev = self.values[(pos + n - 2) % n];
            self.values[pos] = (self.values[pos] + 2.0 * prev + prev_prev) / 4.0;
        } else if pos == 1 {
            self.values[1] = (self.values[1] + self.values[0]) / 2.0;
        }
    }

    /// Flytt markøren én plass, med omløp.
    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % self.values.len();
    }

    pub fn is_last_slot(&self) -> bool {
        self.cursor == self.values.len() - 1
    }

    /// Topp: ingen annen verdi er større, og minst én er mindre.
    /// Et helt flatt vindu har verken topp eller bunn.
    pub fn is_peak(&self, i: usize) -> bool {
        let v = self.values[i];
        let mut any_lower = false;
        for (j, &x) in self.values.iter().enumerate() {
            if j == i {
                continue;
            }
            if x > v {
                return false;
            }
            if x < v {
                any_lower = true;
            }
        }
        any_lower
    }

    /// Bunn: ingen annen verdi er mindre, og minst én er større.
    pub fn is_valley(&self, i: usize) -> bool {
        let v = self.values[i];
        let mut any_higher = false;
        for (j, &x) in self.values.iter().enumerate() {
            if j == i {
                continue;
            }
            if x < v {
                return false;
            }
            if x > v {
                any_higher = true;
            }
        }
        any_higher
    }
}
